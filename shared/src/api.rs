//! Remote sync client.
//!
//! Maps the painter's six remote operations onto one-shot requests through
//! the `crux_http` capability and decodes the replies into
//! `Result<T, RemoteError>`. There is no retry, backoff, idempotency key or
//! authentication.

use crux_http::{Http, HttpError, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpMethod, ValidatedUrl};
use crate::config::PainterConfig;
use crate::error::RemoteError;
use crate::grid::Grid;
use crate::model::{Brightness, DeviceHealth, SavedGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteOperation {
    SubmitGrid,
    ClearDisplay,
    SetBrightness,
    CheckHealth,
    FetchHistory,
    GenerateGrid,
}

impl RemoteOperation {
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        match self {
            Self::CheckHealth | Self::FetchHistory => HttpMethod::Get,
            Self::SubmitGrid | Self::ClearDisplay | Self::SetBrightness | Self::GenerateGrid => {
                HttpMethod::Post
            }
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SubmitGrid => "/grid",
            Self::ClearDisplay => "/clear",
            Self::SetBrightness => "/brightness",
            Self::CheckHealth => "/health",
            Self::FetchHistory => "/history",
            Self::GenerateGrid => "/generate",
        }
    }

    #[must_use]
    pub const fn default_error_message(self) -> &'static str {
        match self {
            Self::SubmitGrid => "Failed to update grid",
            Self::ClearDisplay => "Failed to clear grid",
            Self::SetBrightness => "Failed to set brightness",
            Self::CheckHealth => "Server is not responding",
            Self::FetchHistory => "Failed to fetch grid history",
            Self::GenerateGrid => "Failed to generate grid",
        }
    }

    /// Health failures always read "not responding", whatever the body says.
    #[must_use]
    pub const fn reports_server_errors(self) -> bool {
        !matches!(self, Self::CheckHealth)
    }

    pub fn url(self, config: &PainterConfig) -> Result<ValidatedUrl, RemoteError> {
        config
            .api_url
            .join_path(self.path())
            .map_err(|e| RemoteError::request(self, &e))
    }
}

/// `{status, message}` acknowledgement from the mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedGrid {
    pub grid: Grid,
    pub word: String,
}

#[derive(Serialize)]
struct SubmitGridBody<'a> {
    grid: &'a Grid,
}

#[derive(Serialize)]
struct BrightnessBody {
    brightness: f64,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    word: &'a str,
}

/// Entries stay raw so one unreadable record does not hide the rest.
#[derive(Debug, Deserialize)]
struct HistoryBody {
    grids: Vec<serde_json::Value>,
}

impl HistoryBody {
    fn into_saved_grids(self) -> Vec<SavedGrid> {
        self.grids
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<SavedGrid>(entry) {
                Ok(saved) => Some(saved),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unreadable history entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn server_error_field(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
}

/// Decodes a status and body already received from the server.
pub fn decode_body<T: DeserializeOwned>(
    operation: RemoteOperation,
    status: u16,
    body: &[u8],
) -> Result<T, RemoteError> {
    if !(200..300).contains(&status) {
        return Err(RemoteError::rejected(
            operation,
            status,
            server_error_field(body),
        ));
    }

    serde_json::from_slice(body).map_err(|e| RemoteError::malformed(operation, &e))
}

/// Turns a `crux_http` outcome into the operation's typed result.
pub fn decode<T: DeserializeOwned>(
    operation: RemoteOperation,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, RemoteError> {
    match result {
        Ok(response) => {
            let status = u16::from(response.status());
            let body = response.body().map(Vec::as_slice).unwrap_or_default();
            decode_body(operation, status, body)
        }
        Err(HttpError::Http { code, message, .. }) => Err(RemoteError::rejected(
            operation,
            u16::from(code),
            server_error_field(message.as_bytes()),
        )),
        Err(error) => Err(RemoteError::unreachable(operation, &error)),
    }
}

/// Typed façade over the [`Http`] capability. Each call dispatches one
/// request and later delivers exactly one event built from its outcome.
/// An `Err` return means nothing was dispatched.
pub struct SyncClient<'a, Ev> {
    http: &'a Http<Ev>,
    config: &'a PainterConfig,
}

impl<'a, Ev> SyncClient<'a, Ev>
where
    Ev: Send + 'static,
{
    pub fn new(http: &'a Http<Ev>, config: &'a PainterConfig) -> Self {
        Self { http, config }
    }

    pub fn submit_grid<F>(&self, grid: &Grid, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<Ack, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::SubmitGrid;
        let request = self.json_request(operation, &SubmitGridBody { grid })?;
        Self::dispatch(operation, request, make_event);
        Ok(())
    }

    pub fn clear_display<F>(&self, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<Ack, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::ClearDisplay;
        let request = self.request(operation)?;
        Self::dispatch(operation, request, make_event);
        Ok(())
    }

    pub fn set_brightness<F>(&self, brightness: Brightness, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<Ack, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::SetBrightness;
        let body = BrightnessBody {
            brightness: brightness.value().clamp(0.0, 1.0),
        };
        let request = self.json_request(operation, &body)?;
        Self::dispatch(operation, request, make_event);
        Ok(())
    }

    pub fn check_health<F>(&self, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<DeviceHealth, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::CheckHealth;
        let request = self.request(operation)?;
        Self::dispatch(operation, request, make_event);
        Ok(())
    }

    pub fn fetch_history<F>(&self, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<Vec<SavedGrid>, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::FetchHistory;
        self.request(operation)?.send(move |result| {
            make_event(decode::<HistoryBody>(operation, result).map(HistoryBody::into_saved_grids))
        });
        Ok(())
    }

    pub fn generate_grid<F>(&self, word: &str, make_event: F) -> Result<(), RemoteError>
    where
        F: FnOnce(Result<GeneratedGrid, RemoteError>) -> Ev + Send + 'static,
    {
        let operation = RemoteOperation::GenerateGrid;
        let request = self.json_request(operation, &GenerateBody { word })?;
        Self::dispatch(operation, request, make_event);
        Ok(())
    }

    fn request(&self, operation: RemoteOperation) -> Result<RequestBuilder<Ev>, RemoteError> {
        let url = operation.url(self.config)?;
        tracing::debug!(?operation, url = url.as_str(), "dispatching request");
        Ok(match operation.method() {
            HttpMethod::Get => self.http.get(url.as_str()),
            HttpMethod::Post => self.http.post(url.as_str()),
        })
    }

    fn json_request<B: Serialize>(
        &self,
        operation: RemoteOperation,
        body: &B,
    ) -> Result<RequestBuilder<Ev>, RemoteError> {
        self.request(operation)?
            .body_json(body)
            .map_err(|e| RemoteError::request(operation, &e))
    }

    fn dispatch<T, F>(operation: RemoteOperation, request: RequestBuilder<Ev>, make_event: F)
    where
        T: DeserializeOwned,
        F: FnOnce(Result<T, RemoteError>) -> Ev + Send + 'static,
    {
        request.send(move |result| make_event(decode(operation, result)));
    }
}
