use serde::{Deserialize, Serialize};

use crate::color::{Color, PRESET_COLORS};
use crate::grid::Grid;
use crate::model::{Connectivity, MessageKind, Model, SavedGrid, StatusMessage};
use crate::{format_created_at, format_time_ago, parse_timestamp_ms, WORD_SUGGESTIONS};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    /// CSS `rgb(...)`.
    pub fill: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwatchView {
    pub hex: String,
    pub fill: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedGridView {
    pub id: String,
    pub time_ago: String,
    pub title: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
    pub kind: MessageKind,
    pub text: String,
}

impl From<&StatusMessage> for MessageView {
    fn from(m: &StatusMessage) -> Self {
        Self {
            kind: m.kind,
            text: m.text.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub cells: Vec<Vec<CellView>>,
    pub selected_color_hex: String,
    pub selected_color_fill: String,
    pub presets: Vec<SwatchView>,
    pub brightness_percent: u8,
    pub connectivity: Connectivity,
    pub connectivity_label: String,
    pub device_available: Option<bool>,
    pub is_submitting: bool,
    pub can_submit: bool,
    pub is_generating: bool,
    pub can_generate: bool,
    pub word_suggestions: Vec<String>,
    pub message: Option<MessageView>,
    pub history: Vec<SavedGridView>,
    pub is_loading_history: bool,
}

fn cell_views(grid: &Grid) -> Vec<Vec<CellView>> {
    grid.rows()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, color)| CellView {
                    x,
                    y,
                    fill: color.to_display_string(),
                })
                .collect()
        })
        .collect()
}

fn swatch(color: Color, selected: Color) -> SwatchView {
    SwatchView {
        hex: color.to_hex(),
        fill: color.to_display_string(),
        is_selected: color == selected,
    }
}

fn saved_grid_view(saved: &SavedGrid, now_ms: i64) -> SavedGridView {
    let time_ago = parse_timestamp_ms(&saved.timestamp)
        .map(|ts| format_time_ago(ts, now_ms))
        .unwrap_or_default();

    SavedGridView {
        id: saved.id.to_string(),
        time_ago,
        title: format!("Created at {}", format_created_at(&saved.timestamp)),
        rows: saved
            .grid
            .rows()
            .map(|row| row.iter().map(|c| c.to_display_string()).collect())
            .collect(),
    }
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            cells: cell_views(&model.grid),
            selected_color_hex: model.selected_color.to_hex(),
            selected_color_fill: model.selected_color.to_display_string(),
            presets: PRESET_COLORS
                .iter()
                .map(|c| swatch(*c, model.selected_color))
                .collect(),
            brightness_percent: model.brightness.percent(),
            connectivity: model.connectivity,
            connectivity_label: model.connectivity.label().to_string(),
            device_available: model.device.as_ref().map(|d| d.device_available),
            is_submitting: model.is_submitting,
            can_submit: model.can_submit(),
            is_generating: model.is_generating,
            can_generate: model.can_generate(),
            word_suggestions: WORD_SUGGESTIONS.iter().map(|w| (*w).to_string()).collect(),
            message: model.message.as_ref().map(MessageView::from),
            history: model
                .history
                .iter()
                .map(|saved| saved_grid_view(saved, model.now_ms))
                .collect(),
            is_loading_history: model.is_loading_history,
        }
    }
}
