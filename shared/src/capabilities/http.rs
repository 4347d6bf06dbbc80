use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("invalid URL '{url}': {reason}")]
pub struct InvalidUrl {
    pub url: String,
    pub reason: String,
}

/// An absolute `http`/`https` URL with a host, checked before it is handed
/// to `crux_http`.
///
/// The painter talks to a device on the local network, so private and
/// loopback hosts are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl {
    url: String,
    scheme: String,
    host: String,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, InvalidUrl> {
        let url = url.into();
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(InvalidUrl {
                url,
                reason: "URL cannot be empty".to_string(),
            });
        }

        if trimmed.len() > MAX_URL_LENGTH {
            return Err(Self::invalid(
                trimmed,
                format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            ));
        }

        let parsed = Url::parse(trimmed).map_err(|e| Self::invalid(trimmed, e.to_string()))?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(Self::invalid(
                trimmed,
                format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            ));
        }

        let Some(host) = parsed.host_str() else {
            return Err(Self::invalid(trimmed, "URL must have a host".to_string()));
        };
        let host = host.to_lowercase();

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(Self::invalid(
                trimmed,
                "credentials in URL are not allowed".to_string(),
            ));
        }

        Ok(Self {
            url: parsed.to_string(),
            scheme,
            host,
        })
    }

    /// Appends an absolute endpoint path (`/grid`) to this base, keeping any
    /// base path prefix.
    pub fn join_path(&self, path: &str) -> Result<Self, InvalidUrl> {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Self::new(format!("{base}/{path}"))
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn invalid(url: &str, reason: String) -> InvalidUrl {
        InvalidUrl {
            url: Self::truncate_url(url),
            reason,
        }
    }

    fn truncate_url(url: &str) -> String {
        match url.char_indices().nth(100) {
            Some((cut, _)) => format!("{}...", &url[..cut]),
            None => url.to_string(),
        }
    }
}

impl AsRef<str> for ValidatedUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}
