use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capabilities::ValidatedUrl;
use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Build-time override for the API base URL, mirroring how the web shell is
/// configured.
pub const API_URL_ENV: Option<&str> = option_env!("UNICORN_API_URL");

pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const STATUS_MESSAGE_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainterConfig {
    pub api_url: ValidatedUrl,
    pub health_poll_interval: Duration,
    pub status_message_lifetime: Duration,
}

impl PainterConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: ValidatedUrl::new(api_url)?,
            health_poll_interval: HEALTH_POLL_INTERVAL,
            status_message_lifetime: STATUS_MESSAGE_LIFETIME,
        })
    }

    /// Uses `UNICORN_API_URL` when it was set at build time and is valid,
    /// otherwise [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        if let Some(url) = API_URL_ENV {
            match Self::new(url) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(url, error = %e, "ignoring UNICORN_API_URL"),
            }
        }
        Self::fallback()
    }

    /// Replaces the base URL, keeping the other settings.
    pub fn with_api_url(&self, api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: ValidatedUrl::new(api_url)?,
            ..self.clone()
        })
    }

    fn fallback() -> Self {
        let api_url = match ValidatedUrl::new(DEFAULT_API_URL) {
            Ok(url) => url,
            Err(e) => unreachable!("default API URL is valid: {e}"),
        };
        Self {
            api_url,
            health_poll_interval: HEALTH_POLL_INTERVAL,
            status_message_lifetime: STATUS_MESSAGE_LIFETIME,
        }
    }
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
