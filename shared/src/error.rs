use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

use crate::api::RemoteOperation;
use crate::capabilities::InvalidUrl;

/// Failure of one remote operation. `Display` is the user-facing message;
/// transport and decode detail is kept separately for logs.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Unreachable {
        operation: RemoteOperation,
        message: String,
        detail: String,
    },

    /// Non-2xx response. `message` is the server's `error` field when it
    /// sent one, otherwise the operation's default.
    #[error("{message}")]
    Rejected {
        operation: RemoteOperation,
        status: u16,
        message: String,
    },

    /// 2xx response whose body did not decode.
    #[error("{message}")]
    Malformed {
        operation: RemoteOperation,
        message: String,
        detail: String,
    },

    /// The request could not be built.
    #[error("{message}")]
    Request {
        operation: RemoteOperation,
        message: String,
        detail: String,
    },
}

impl RemoteError {
    pub fn unreachable(operation: RemoteOperation, error: &impl Display) -> Self {
        Self::Unreachable {
            operation,
            message: operation.default_error_message().to_string(),
            detail: error.to_string(),
        }
    }

    pub fn rejected(operation: RemoteOperation, status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|_| operation.reports_server_errors())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| operation.default_error_message().to_string());
        Self::Rejected {
            operation,
            status,
            message,
        }
    }

    pub fn malformed(operation: RemoteOperation, error: &impl Display) -> Self {
        Self::Malformed {
            operation,
            message: operation.default_error_message().to_string(),
            detail: error.to_string(),
        }
    }

    pub fn request(operation: RemoteOperation, error: &impl Display) -> Self {
        Self::Request {
            operation,
            message: operation.default_error_message().to_string(),
            detail: error.to_string(),
        }
    }

    pub fn operation(&self) -> RemoteOperation {
        match self {
            Self::Unreachable { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Malformed { operation, .. }
            | Self::Request { operation, .. } => *operation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unreachable { message, .. }
            | Self::Rejected { message, .. }
            | Self::Malformed { message, .. }
            | Self::Request { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL: {0}")]
    InvalidApiUrl(#[from] InvalidUrl),
}
