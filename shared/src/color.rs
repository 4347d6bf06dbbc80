use serde::{Deserialize, Serialize};
use std::fmt;

/// A single LED color. Channels are `u8`, so the [0, 255] range holds by
/// construction; wire values outside it fail to deserialize.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// LED off.
pub const DEFAULT_COLOR: Color = Color::rgb(0, 0, 0);

pub const PRESET_COLORS: [Color; 10] = [
    Color::rgb(255, 0, 0),     // red
    Color::rgb(255, 127, 0),   // orange
    Color::rgb(255, 255, 0),   // yellow
    Color::rgb(0, 255, 0),     // green
    Color::rgb(0, 255, 255),   // cyan
    Color::rgb(0, 0, 255),     // blue
    Color::rgb(127, 0, 255),   // purple
    Color::rgb(255, 0, 255),   // magenta
    Color::rgb(255, 255, 255), // white
    Color::rgb(0, 0, 0),       // off
];

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn is_off(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// CSS `rgb(r, g, b)` form for renderers.
    #[must_use]
    pub fn to_display_string(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `#rrggbb`, lowercase, as native color inputs expect.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Parses `#rrggbb` or `rrggbb`, case-insensitive.
    ///
    /// Malformed input yields [`DEFAULT_COLOR`] so a bad paste never breaks
    /// the editor. Use [`Color::try_from_hex`] to tell malformed input apart
    /// from black.
    #[must_use]
    pub fn from_hex(input: &str) -> Self {
        Self::try_from_hex(input).unwrap_or(DEFAULT_COLOR)
    }

    #[must_use]
    pub fn try_from_hex(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 {
            return None;
        }

        let mut channels = [0u8; 3];
        hex::decode_to_slice(digits, &mut channels).ok()?;
        let [r, g, b] = channels;
        Some(Self { r, g, b })
    }
}

/// Uppercase `#RRGGBB`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode_upper([self.r, self.g, self.b]))
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}
