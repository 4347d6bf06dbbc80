use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::TimerId;
use crate::color::{Color, PRESET_COLORS};
use crate::config::PainterConfig;
use crate::grid::Grid;

pub const MIN_BRIGHTNESS: f64 = 0.30;
pub const MAX_BRIGHTNESS: f64 = 0.70;
pub const DEFAULT_BRIGHTNESS: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedGridId(pub String);

impl SavedGridId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SavedGridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A grid the server recorded on submission. Read-only on this side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGrid {
    pub id: SavedGridId,
    /// ISO-8601, as sent by the server.
    pub timestamp: String,
    pub grid: Grid,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

/// Body of a successful `GET /health`. Any JSON object counts as healthy;
/// missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "unicorn_available")]
    pub device_available: bool,
    #[serde(default, rename = "grid_size")]
    pub grid_dimensions: GridDimensions,
}

/// Display brightness. The device accepts [0.0, 1.0]; the editor keeps it
/// within [`MIN_BRIGHTNESS`, `MAX_BRIGHTNESS`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Brightness(f64);

impl Brightness {
    /// Clamps into the editor range; non-finite input gives the default.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        Self(value.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS))
    }

    /// Slider positions are whole percents.
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        Self::clamped(f64::from(percent) / 100.0)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        // Always within 30..=70 after clamping.
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(DEFAULT_BRIGHTNESS)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl Connectivity {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Checking...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
}

/// Transient status line. Expires when the timer armed for it fires; a newer
/// message replaces it along with its timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
    pub timer: TimerId,
}

/// Scoped ownership of the health-poll timer. Only a firing of the armed id
/// counts; anything else is a leftover from a cancelled schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSchedule {
    armed: Option<TimerId>,
}

impl PollSchedule {
    pub fn arm(&mut self, id: TimerId) {
        self.armed = Some(id);
    }

    /// Disarms and returns the timer to cancel, if any.
    pub fn disarm(&mut self) -> Option<TimerId> {
        self.armed.take()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.armed.is_some()
    }

    /// True if `id` is the armed timer; consumes it so it fires once.
    pub fn take_if_current(&mut self, id: TimerId) -> bool {
        if self.armed == Some(id) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub config: PainterConfig,
    pub session_active: bool,

    // Editor
    pub grid: Grid,
    pub selected_color: Color,
    pub brightness: Brightness,

    // Sync
    pub is_submitting: bool,
    pub is_generating: bool,
    pub connectivity: Connectivity,
    pub device: Option<DeviceHealth>,
    pub health_poll: PollSchedule,

    // History
    pub history: Vec<SavedGrid>,
    pub is_loading_history: bool,

    pub message: Option<StatusMessage>,

    pub now_ms: i64,
    next_timer: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(PainterConfig::default())
    }
}

impl Model {
    #[must_use]
    pub fn new(config: PainterConfig) -> Self {
        Self {
            config,
            session_active: false,
            grid: Grid::empty(),
            selected_color: PRESET_COLORS[0],
            brightness: Brightness::default(),
            is_submitting: false,
            is_generating: false,
            connectivity: Connectivity::Unknown,
            device: None,
            health_poll: PollSchedule::default(),
            history: Vec::new(),
            is_loading_history: false,
            message: None,
            now_ms: 0,
            next_timer: 0,
        }
    }

    pub fn next_timer_id(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId(self.next_timer)
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && self.connectivity.is_connected()
    }

    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.is_generating && self.connectivity.is_connected()
    }

    pub fn saved_grid(&self, id: &SavedGridId) -> Option<&SavedGrid> {
        self.history.iter().find(|saved| &saved.id == id)
    }

    pub fn update_timestamp(&mut self) {
        self.now_ms = chrono::Utc::now().timestamp_millis();
    }
}
