use serde::{Deserialize, Serialize};

use crate::color::{Color, DEFAULT_COLOR};

/// Side length of the Unicorn HAT matrix.
pub const GRID_SIZE: usize = 8;

type Cells = [[Color; GRID_SIZE]; GRID_SIZE];

/// The LED matrix state, row-major: `cells[y][x]`.
///
/// A `Grid` is a plain value. Cloning copies every cell, so the editor grid,
/// history snapshots and view copies can never alias each other. On the wire
/// it is a nested `8×8` array of `{r,g,b}` objects; any other shape fails to
/// deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Cells,
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// Every LED off.
    #[must_use]
    pub fn empty() -> Self {
        Self::filled(DEFAULT_COLOR)
    }

    #[must_use]
    pub fn filled(color: Color) -> Self {
        Self {
            cells: [[color; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Returns a copy with the cell at column `x`, row `y` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not below [`GRID_SIZE`]. Callers index from
    /// loops over the grid bounds; use [`Grid::contains`] to check
    /// coordinates that come from outside.
    #[must_use]
    pub fn with_cell(&self, x: usize, y: usize, color: Color) -> Self {
        assert!(
            Self::contains(x, y),
            "cell ({x}, {y}) is outside the {GRID_SIZE}x{GRID_SIZE} grid"
        );
        let mut next = self.clone();
        next.cells[y][x] = color;
        next
    }

    #[must_use]
    pub const fn contains(x: usize, y: usize) -> bool {
        x < GRID_SIZE && y < GRID_SIZE
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color; GRID_SIZE]> {
        self.cells.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, c)| (x, y, *c)))
    }

    #[must_use]
    pub fn lit_cells(&self) -> usize {
        self.cells().filter(|(_, _, c)| !c.is_off()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lit_cells() == 0
    }
}
