use tracing::{debug, info, warn};

use crate::api::SyncClient;
use crate::capabilities::{Capabilities, TimerOutput};
use crate::color::Color;
use crate::error::RemoteError;
use crate::event::{Event, RemoteResult};
use crate::grid::Grid;
use crate::model::{Brightness, Connectivity, DeviceHealth, MessageKind, Model, StatusMessage};
use crate::view::ViewModel;
use crate::{GRID_CLEARED_MESSAGE, GRID_LOADED_MESSAGE, GRID_SENT_MESSAGE, MAX_WORD_LENGTH};

#[derive(Default)]
pub struct App;

impl App {
    /// Replaces the current message. The old message's timer is cancelled so
    /// its expiry can never clear the new one.
    fn show_message(
        model: &mut Model,
        caps: &Capabilities,
        kind: MessageKind,
        text: impl Into<String>,
    ) {
        if let Some(previous) = model.message.take() {
            caps.timer.cancel(previous.timer);
        }

        let timer = model.next_timer_id();
        caps.timer.notify_after(
            timer,
            model.config.status_message_lifetime,
            Event::StatusMessageExpired,
        );
        model.message = Some(StatusMessage {
            kind,
            text: text.into(),
            timer,
        });
    }

    fn check_health(model: &mut Model, caps: &Capabilities) {
        let dispatched = SyncClient::new(&caps.http, &model.config)
            .check_health(|result| Event::HealthChecked(Box::new(result)));

        if let Err(error) = dispatched {
            Self::apply_health(model, Err(error));
        }
    }

    fn apply_health(model: &mut Model, result: RemoteResult<DeviceHealth>) {
        match result {
            Ok(health) => {
                if !model.connectivity.is_connected() {
                    info!(
                        device_available = health.device_available,
                        status = %health.status,
                        "server connected"
                    );
                }
                model.connectivity = Connectivity::Connected;
                model.device = Some(health);
            }
            Err(error) => {
                if model.connectivity != Connectivity::Disconnected {
                    warn!(detail = ?error, "health check failed");
                }
                model.connectivity = Connectivity::Disconnected;
                model.device = None;
            }
        }
    }

    fn schedule_health_poll(model: &mut Model, caps: &Capabilities) {
        let timer = model.next_timer_id();
        model.health_poll.arm(timer);
        caps.timer
            .notify_after(timer, model.config.health_poll_interval, Event::HealthPollDue);
    }

    fn stop_health_poll(model: &mut Model, caps: &Capabilities) {
        if let Some(timer) = model.health_poll.disarm() {
            debug!(%timer, "health polling stopped");
            caps.timer.cancel(timer);
        }
    }

    fn refresh_history(model: &mut Model, caps: &Capabilities) {
        let dispatched = SyncClient::new(&caps.http, &model.config)
            .fetch_history(|result| Event::HistoryFetched(Box::new(result)));

        match dispatched {
            Ok(()) => model.is_loading_history = true,
            Err(error) => warn!(detail = ?error, "history refresh not sent"),
        }
    }

    fn fail_submission(model: &mut Model, caps: &Capabilities, error: &RemoteError) {
        model.is_submitting = false;
        warn!(
            operation = ?error.operation(),
            status = ?error.status(),
            detail = ?error,
            "submission failed"
        );
        Self::show_message(model, caps, MessageKind::Error, error.message());
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.update_timestamp();
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "handling event"
        );

        match event {
            Event::SessionStarted => {
                if model.session_active {
                    Self::stop_health_poll(model, caps);
                }
                model.session_active = true;
                info!(api_url = model.config.api_url.as_str(), "session started");

                Self::check_health(model, caps);
                Self::refresh_history(model, caps);
                Self::schedule_health_poll(model, caps);
            }

            Event::SessionEnded => {
                model.session_active = false;
                Self::stop_health_poll(model, caps);
                if let Some(message) = model.message.take() {
                    caps.timer.cancel(message.timer);
                }
                info!("session ended");
            }

            Event::Configure { api_url } => match model.config.with_api_url(&api_url) {
                Ok(config) => {
                    info!(api_url = config.api_url.as_str(), "API URL changed");
                    model.config = config;
                    model.connectivity = Connectivity::Unknown;
                    model.device = None;
                    if model.session_active {
                        Self::check_health(model, caps);
                    }
                }
                Err(error) => {
                    warn!(%api_url, %error, "keeping previous API URL");
                    return;
                }
            },

            Event::CellPainted { x, y } => {
                if !Grid::contains(x, y) {
                    warn!(x, y, "paint outside the grid ignored");
                    return;
                }
                model.grid = model.grid.with_cell(x, y, model.selected_color);
            }

            Event::FillRequested => {
                model.grid = Grid::filled(model.selected_color);
            }

            Event::ColorSelected { color } => {
                model.selected_color = color;
            }

            Event::HexColorEntered { hex } => {
                if Color::try_from_hex(&hex).is_none() {
                    debug!(%hex, "malformed hex color, falling back to off");
                }
                model.selected_color = Color::from_hex(&hex);
            }

            Event::BrightnessChanged { value } => {
                model.brightness = Brightness::clamped(value);
            }

            Event::BrightnessSliderMoved { percent } => {
                model.brightness = Brightness::from_percent(percent);
            }

            Event::SubmitRequested => {
                if !model.can_submit() {
                    debug!(
                        is_submitting = model.is_submitting,
                        connectivity = ?model.connectivity,
                        "submit ignored"
                    );
                    return;
                }

                model.is_submitting = true;
                let dispatched = SyncClient::new(&caps.http, &model.config)
                    .submit_grid(&model.grid, |result| Event::GridSubmitted(Box::new(result)));
                if let Err(error) = dispatched {
                    Self::fail_submission(model, caps, &error);
                }
            }

            Event::GridSubmitted(result) => match *result {
                Ok(ack) => {
                    debug!(status = %ack.status, message = %ack.message, "grid accepted");
                    let dispatched = SyncClient::new(&caps.http, &model.config)
                        .set_brightness(model.brightness, |result| {
                            Event::BrightnessApplied(Box::new(result))
                        });
                    if let Err(error) = dispatched {
                        Self::fail_submission(model, caps, &error);
                    }
                }
                Err(error) => Self::fail_submission(model, caps, &error),
            },

            Event::BrightnessApplied(result) => match *result {
                Ok(_) => {
                    model.is_submitting = false;
                    info!(
                        lit_cells = model.grid.lit_cells(),
                        brightness = model.brightness.value(),
                        "grid sent"
                    );
                    Self::show_message(model, caps, MessageKind::Success, GRID_SENT_MESSAGE);
                    Self::refresh_history(model, caps);
                }
                Err(error) => Self::fail_submission(model, caps, &error),
            },

            Event::ClearRequested => {
                model.grid = Grid::empty();

                if model.connectivity.is_connected() {
                    let dispatched = SyncClient::new(&caps.http, &model.config)
                        .clear_display(|result| Event::DisplayCleared(Box::new(result)));
                    if let Err(error) = dispatched {
                        Self::show_message(model, caps, MessageKind::Error, error.message());
                    }
                }
            }

            Event::DisplayCleared(result) => match *result {
                Ok(_) => Self::show_message(model, caps, MessageKind::Success, GRID_CLEARED_MESSAGE),
                Err(error) => {
                    // The local grid stays cleared.
                    warn!(detail = ?error, "remote clear failed");
                    Self::show_message(model, caps, MessageKind::Error, error.message());
                }
            },

            Event::HistoryRequested => {
                Self::refresh_history(model, caps);
            }

            Event::HistoryFetched(result) => {
                model.is_loading_history = false;
                match *result {
                    Ok(grids) => {
                        debug!(count = grids.len(), "history loaded");
                        model.history = grids;
                    }
                    Err(error) => warn!(detail = ?error, "history fetch failed"),
                }
            }

            Event::SavedGridSelected { id } => {
                let Some(grid) = model.saved_grid(&id).map(|saved| saved.grid.clone()) else {
                    warn!(%id, "unknown saved grid");
                    return;
                };
                model.grid = grid;
                Self::show_message(model, caps, MessageKind::Success, GRID_LOADED_MESSAGE);
            }

            Event::GenerateRequested { word } => {
                let word = word.trim();
                if word.is_empty() || word.chars().count() > MAX_WORD_LENGTH {
                    debug!(len = word.len(), "generate ignored: invalid word");
                    return;
                }
                if !model.can_generate() {
                    debug!(
                        is_generating = model.is_generating,
                        connectivity = ?model.connectivity,
                        "generate ignored"
                    );
                    return;
                }

                let dispatched = SyncClient::new(&caps.http, &model.config)
                    .generate_grid(word, |result| Event::GridGenerated(Box::new(result)));
                match dispatched {
                    Ok(()) => model.is_generating = true,
                    Err(error) => {
                        Self::show_message(model, caps, MessageKind::Error, error.message());
                    }
                }
            }

            Event::GridGenerated(result) => {
                model.is_generating = false;
                match *result {
                    Ok(generated) => {
                        info!(word = %generated.word, "grid generated");
                        model.grid = generated.grid;
                        Self::show_message(
                            model,
                            caps,
                            MessageKind::Success,
                            format!("Generated \"{}\"! Click \"Send\" to display it.", generated.word),
                        );
                    }
                    Err(error) => {
                        warn!(detail = ?error, "generation failed");
                        Self::show_message(model, caps, MessageKind::Error, error.message());
                    }
                }
            }

            Event::HealthPollDue(output) => {
                let TimerOutput::Elapsed { id } = output else {
                    return;
                };
                if !model.health_poll.take_if_current(id) || !model.session_active {
                    debug!(timer = %id, "stale health poll ignored");
                    return;
                }
                Self::check_health(model, caps);
                Self::schedule_health_poll(model, caps);
            }

            Event::HealthChecked(result) => {
                Self::apply_health(model, *result);
            }

            Event::StatusMessageExpired(output) => {
                let id = output.id();
                if model.message.as_ref().map(|m| m.timer) != Some(id) {
                    return;
                }
                model.message = None;
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Effect, TimerId};
    use crate::model::{SavedGrid, SavedGridId};
    use crux_core::testing::AppTester;

    fn connected_model() -> Model {
        let mut model = Model::default();
        model.connectivity = Connectivity::Connected;
        model
    }

    fn http_paths(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Http(request) => Some(request.operation.url.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn paint_uses_selected_color() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::ColorSelected { color: Color::rgb(0, 0, 255) }, &mut model);
        app.update(Event::CellPainted { x: 2, y: 6 }, &mut model);

        assert_eq!(model.grid.cell(2, 6), Some(Color::rgb(0, 0, 255)));
        assert_eq!(model.grid.lit_cells(), 1);
    }

    #[test]
    fn paint_outside_grid_is_ignored() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::CellPainted { x: 8, y: 0 }, &mut model);

        assert!(model.grid.is_empty());
        assert!(update.effects.is_empty());
    }

    #[test]
    fn fill_and_hex_entry() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::HexColorEntered { hex: "#00FF7F".into() }, &mut model);
        assert_eq!(model.selected_color, Color::rgb(0, 255, 127));

        app.update(Event::FillRequested, &mut model);
        assert_eq!(model.grid, Grid::filled(Color::rgb(0, 255, 127)));

        app.update(Event::HexColorEntered { hex: "oops".into() }, &mut model);
        assert!(model.selected_color.is_off());
    }

    #[test]
    fn brightness_inputs_are_clamped() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::BrightnessChanged { value: 0.9 }, &mut model);
        assert_eq!(model.brightness.percent(), 70);

        app.update(Event::BrightnessSliderMoved { percent: 10 }, &mut model);
        assert_eq!(model.brightness.percent(), 30);
    }

    #[test]
    fn submit_ignored_when_not_connected() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::SubmitRequested, &mut model);

        assert!(!model.is_submitting);
        assert!(update.effects.is_empty());
    }

    #[test]
    fn submit_ignored_while_in_flight() {
        let app = AppTester::<App, Effect>::default();
        let mut model = connected_model();

        let first = app.update(Event::SubmitRequested, &mut model);
        assert_eq!(http_paths(&first.effects).len(), 1);

        let second = app.update(Event::SubmitRequested, &mut model);
        assert!(http_paths(&second.effects).is_empty());
        assert!(model.is_submitting);
    }

    #[test]
    fn newer_message_survives_older_expiry() {
        let app = AppTester::<App, Effect>::default();
        let mut model = connected_model();
        model.history = vec![SavedGrid {
            id: SavedGridId::new("a"),
            timestamp: "2024-05-01T12:00:00Z".into(),
            grid: Grid::filled(Color::rgb(9, 9, 9)),
        }];

        app.update(Event::SavedGridSelected { id: SavedGridId::new("a") }, &mut model);
        let first = model.message.as_ref().map(|m| m.timer);
        app.update(Event::SavedGridSelected { id: SavedGridId::new("a") }, &mut model);
        let second = model.message.as_ref().map(|m| m.timer);
        assert_ne!(first, second);

        let stale = TimerOutput::Elapsed { id: first.unwrap() };
        app.update(Event::StatusMessageExpired(stale), &mut model);
        assert!(model.message.is_some());

        let current = TimerOutput::Elapsed { id: second.unwrap() };
        app.update(Event::StatusMessageExpired(current), &mut model);
        assert!(model.message.is_none());
    }

    #[test]
    fn unknown_saved_grid_is_ignored() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        model.grid = Grid::filled(Color::rgb(1, 1, 1));

        app.update(Event::SavedGridSelected { id: SavedGridId::new("missing") }, &mut model);

        assert_eq!(model.grid, Grid::filled(Color::rgb(1, 1, 1)));
        assert!(model.message.is_none());
    }

    #[test]
    fn invalid_words_are_not_sent() {
        let app = AppTester::<App, Effect>::default();
        let mut model = connected_model();

        let too_long = "x".repeat(MAX_WORD_LENGTH + 1);
        for word in ["", "   ", too_long.as_str()] {
            let update = app.update(Event::GenerateRequested { word: word.to_string() }, &mut model);
            assert!(http_paths(&update.effects).is_empty(), "word {word:?}");
        }
        assert!(!model.is_generating);
    }

    #[test]
    fn stale_poll_does_not_check_health() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        model.session_active = true;
        model.health_poll.arm(TimerId(40));

        let update = app.update(
            Event::HealthPollDue(TimerOutput::Elapsed { id: TimerId(39) }),
            &mut model,
        );

        assert!(http_paths(&update.effects).is_empty());
        assert!(model.health_poll.is_active());
    }

    #[test]
    fn bad_configure_keeps_url() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        let before = model.config.api_url.clone();

        app.update(Event::Configure { api_url: "ftp://pi".into() }, &mut model);
        assert_eq!(model.config.api_url, before);

        app.update(Event::Configure { api_url: "http://10.0.0.7:5000".into() }, &mut model);
        assert_eq!(model.config.api_url.host(), "10.0.0.7");
    }
}
