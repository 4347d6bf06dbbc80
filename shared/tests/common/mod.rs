#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use crux_http::HttpError;
use serde_json::json;
use shared::capabilities::{TimerId, TimerOperation, TimerOutput};
use shared::{App, Effect, Event, Grid, Model};

pub type Tester = AppTester<App, Effect>;

/// Effects of one or more updates, sorted by kind.
#[derive(Default)]
pub struct Effects {
    pub http: Vec<Request<HttpRequest>>,
    pub timers: Vec<Request<TimerOperation>>,
    pub renders: usize,
}

impl Effects {
    pub fn collect(effects: Vec<Effect>) -> Self {
        let mut sorted = Self::default();
        for effect in effects {
            match effect {
                Effect::Http(request) => sorted.http.push(request),
                Effect::Timer(request) => sorted.timers.push(request),
                Effect::Render(_) => sorted.renders += 1,
            }
        }
        sorted
    }

    pub fn merge(&mut self, other: Effects) {
        self.http.extend(other.http);
        self.timers.extend(other.timers);
        self.renders += other.renders;
    }

    pub fn urls(&self) -> Vec<String> {
        self.http
            .iter()
            .map(|request| request.operation.url.clone())
            .collect()
    }

    pub fn count_path(&self, path: &str) -> usize {
        self.urls().iter().filter(|url| url.ends_with(path)).count()
    }

    /// Removes the first HTTP request whose URL ends with `path`.
    pub fn take_http(&mut self, path: &str) -> Request<HttpRequest> {
        let index = self
            .http
            .iter()
            .position(|request| request.operation.url.ends_with(path))
            .unwrap_or_else(|| panic!("no request for {path}, saw {:?}", self.urls()));
        self.http.remove(index)
    }

    pub fn timer_starts(&self) -> Vec<(TimerId, u64)> {
        self.timers
            .iter()
            .filter_map(|request| match request.operation {
                TimerOperation::Start { id, millis } => Some((id, millis)),
                TimerOperation::Cancel { .. } => None,
            })
            .collect()
    }

    pub fn timer_cancels(&self) -> Vec<TimerId> {
        self.timers
            .iter()
            .filter_map(|request| match request.operation {
                TimerOperation::Cancel { id } => Some(id),
                TimerOperation::Start { .. } => None,
            })
            .collect()
    }

    /// Removes the start request for the timer armed with `millis`.
    pub fn take_timer(&mut self, millis: u64) -> Request<TimerOperation> {
        let index = self
            .timers
            .iter()
            .position(|request| {
                matches!(request.operation, TimerOperation::Start { millis: m, .. } if m == millis)
            })
            .unwrap_or_else(|| panic!("no {millis}ms timer started"));
        self.timers.remove(index)
    }
}

pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

pub fn json_body(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(&request.body).expect("request body is JSON")
}

pub fn update(app: &Tester, model: &mut Model, event: Event) -> Effects {
    Effects::collect(app.update(event, model).effects)
}

fn drain(app: &Tester, model: &mut Model, effects: Vec<Effect>, events: Vec<Event>) -> Effects {
    let mut sorted = Effects::collect(effects);
    for event in events {
        sorted.merge(update(app, model, event));
    }
    sorted
}

/// Resolves an HTTP request and feeds the resulting event back into the app.
pub fn respond(
    app: &Tester,
    model: &mut Model,
    mut request: Request<HttpRequest>,
    result: HttpResult,
) -> Effects {
    let resolved = app
        .resolve(&mut request, result)
        .expect("http request resolves");
    drain(app, model, resolved.effects, resolved.events)
}

pub fn fire(app: &Tester, model: &mut Model, mut request: Request<TimerOperation>) -> Effects {
    let TimerOperation::Start { id, .. } = request.operation else {
        panic!("only started timers fire");
    };
    let resolved = app
        .resolve(&mut request, TimerOutput::Elapsed { id })
        .expect("timer resolves");
    drain(app, model, resolved.effects, resolved.events)
}

pub fn ok_json(value: serde_json::Value) -> HttpResult {
    HttpResult::Ok(HttpResponse::ok().json(value).build())
}

pub fn ok_ack() -> HttpResult {
    ok_json(json!({"status": "ok", "message": "done"}))
}

pub fn healthy() -> HttpResult {
    ok_json(json!({
        "status": "ok",
        "unicorn_available": true,
        "grid_size": {"width": 8, "height": 8}
    }))
}

pub fn unreachable() -> HttpResult {
    HttpResult::Err(HttpError::Io("connection refused".into()))
}

pub fn server_error(status: u16, error: &str) -> HttpResult {
    HttpResult::Ok(HttpResponse::status(status).json(json!({ "error": error })).build())
}

pub fn history(entries: &[(&str, &str, Grid)]) -> HttpResult {
    let grids: Vec<_> = entries
        .iter()
        .map(|(id, timestamp, grid)| json!({"id": id, "timestamp": timestamp, "grid": grid}))
        .collect();
    ok_json(json!({ "grids": grids }))
}

/// Starts a session and answers the first health check and history fetch.
pub fn connected_session(app: &Tester, model: &mut Model) -> Effects {
    let mut effects = update(app, model, Event::SessionStarted);
    let health = effects.take_http("/health");
    let history_request = effects.take_http("/history");
    effects.merge(respond(app, model, health, healthy()));
    effects.merge(respond(app, model, history_request, history(&[])));
    effects
}
