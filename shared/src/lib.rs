#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod model;
pub mod view;

use chrono::{DateTime, NaiveDateTime, Utc};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use color::{Color, DEFAULT_COLOR, PRESET_COLORS};
pub use config::PainterConfig;
pub use error::{ConfigError, RemoteError};
pub use event::Event;
pub use grid::{Grid, GRID_SIZE};
pub use model::{Brightness, Connectivity, MessageKind, Model, SavedGrid, SavedGridId};
pub use view::ViewModel;

pub const MAX_WORD_LENGTH: usize = 50;

pub const WORD_SUGGESTIONS: [&str; 8] = [
    "heart", "star", "sun", "moon", "smiley", "tree", "house", "cat",
];

pub const GRID_SENT_MESSAGE: &str = "Grid sent to Unicorn HAT!";
pub const GRID_CLEARED_MESSAGE: &str = "Grid cleared!";
pub const GRID_LOADED_MESSAGE: &str = "Grid loaded! Click \"Send\" to display it.";

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Server timestamps are ISO-8601, sometimes without an offset. Offset-less
/// values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[must_use]
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    parse_timestamp(raw).map(|ts| ts.timestamp_millis())
}

/// Relative age for history entries. Anything a week or older shows the date.
#[must_use]
pub fn format_time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);

    if diff < MINUTE_MS {
        return "Just now".into();
    }
    if diff < HOUR_MS {
        return format!("{}m ago", diff / MINUTE_MS);
    }
    if diff < DAY_MS {
        return format!("{}h ago", diff / HOUR_MS);
    }
    if diff < 7 * DAY_MS {
        return format!("{}d ago", diff / DAY_MS);
    }

    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Full timestamp for tooltips; unparseable input is shown as sent.
#[must_use]
pub fn format_created_at(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(
        || raw.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
