use serde::{Deserialize, Serialize};

use crate::api::{Ack, GeneratedGrid};
use crate::capabilities::TimerOutput;
use crate::color::Color;
use crate::error::RemoteError;
use crate::model::{DeviceHealth, SavedGrid, SavedGridId};

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Session
    SessionStarted,
    SessionEnded,
    Configure { api_url: String },

    // Editor
    CellPainted { x: usize, y: usize },
    FillRequested,
    ColorSelected { color: Color },
    HexColorEntered { hex: String },
    BrightnessChanged { value: f64 },
    BrightnessSliderMoved { percent: u8 },

    // Sync
    SubmitRequested,
    ClearRequested,
    HistoryRequested,
    SavedGridSelected { id: SavedGridId },
    GenerateRequested { word: String },

    // Timers
    HealthPollDue(TimerOutput),
    StatusMessageExpired(TimerOutput),

    // Remote results
    #[serde(skip)]
    GridSubmitted(Box<RemoteResult<Ack>>),
    #[serde(skip)]
    BrightnessApplied(Box<RemoteResult<Ack>>),
    #[serde(skip)]
    DisplayCleared(Box<RemoteResult<Ack>>),
    #[serde(skip)]
    HealthChecked(Box<RemoteResult<DeviceHealth>>),
    #[serde(skip)]
    HistoryFetched(Box<RemoteResult<Vec<SavedGrid>>>),
    #[serde(skip)]
    GridGenerated(Box<RemoteResult<GeneratedGrid>>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Event::SessionStarted => "session_started",
            Event::SessionEnded => "session_ended",
            Event::Configure { .. } => "configure",
            Event::CellPainted { .. } => "cell_painted",
            Event::FillRequested => "fill_requested",
            Event::ColorSelected { .. } => "color_selected",
            Event::HexColorEntered { .. } => "hex_color_entered",
            Event::BrightnessChanged { .. } => "brightness_changed",
            Event::BrightnessSliderMoved { .. } => "brightness_slider_moved",
            Event::SubmitRequested => "submit_requested",
            Event::ClearRequested => "clear_requested",
            Event::HistoryRequested => "history_requested",
            Event::SavedGridSelected { .. } => "saved_grid_selected",
            Event::GenerateRequested { .. } => "generate_requested",
            Event::HealthPollDue(_) => "health_poll_due",
            Event::StatusMessageExpired(_) => "status_message_expired",
            Event::GridSubmitted(_) => "grid_submitted",
            Event::BrightnessApplied(_) => "brightness_applied",
            Event::DisplayCleared(_) => "display_cleared",
            Event::HealthChecked(_) => "health_checked",
            Event::HistoryFetched(_) => "history_fetched",
            Event::GridGenerated(_) => "grid_generated",
        }
    }

    /// Events that originate from the shell's UI rather than from effects.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Event::CellPainted { .. }
                | Event::FillRequested
                | Event::ColorSelected { .. }
                | Event::HexColorEntered { .. }
                | Event::BrightnessChanged { .. }
                | Event::BrightnessSliderMoved { .. }
                | Event::SubmitRequested
                | Event::ClearRequested
                | Event::HistoryRequested
                | Event::SavedGridSelected { .. }
                | Event::GenerateRequested { .. }
        )
    }
}
