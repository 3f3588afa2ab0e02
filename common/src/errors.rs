//! Error types.
//!
//! [`StoreError`] is what the remote document service reports, [`AppError`]
//! is what an HTTP client sees. Handlers convert the former into the latter
//! with a per-endpoint status and message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::{messages, MessageResponse};

/// Result alias for handler and service code.
pub type AppResult<T> = Result<T, AppError>;

/// Result alias for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by the remote document service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The service answered with a non-success status.
    #[error("remote service responded {status}: {error} ({reason})")]
    Status {
        status: u16,
        error: String,
        reason: String,
    },

    /// The call never produced a usable answer (connect, timeout, decode).
    #[error("remote service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl StoreError {
    /// Status reported for transport failures, which carry none of their own.
    pub const TRANSPORT_STATUS: u16 = 500;

    /// Creates an error from a remote status reply.
    pub fn status(status: u16, error: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Status {
            status,
            error: error.into(),
            reason: reason.into(),
        }
    }

    /// Numeric status code of the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Transport(_) => Self::TRANSPORT_STATUS,
        }
    }

    /// Whether the remote service reported "not found".
    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required parameter is absent; no remote call was made.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// The request body or query string could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The remote call failed.
    #[error("{message}: {source}")]
    Remote {
        status: StatusCode,
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Wraps a remote failure with the status and message to answer with.
    pub fn remote(status: StatusCode, message: &'static str, source: StoreError) -> Self {
        Self::Remote {
            status,
            message,
            source,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Remote { status, .. } => *status,
        }
    }

    /// Message placed in the response body.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingParameter(message) => message,
            Self::InvalidRequest(_) => messages::INVALID_REQUEST,
            Self::Remote { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Remote { source, .. } => tracing::error!(
                status = status.as_u16(),
                remote_status = source.status_code(),
                error = %source,
                "{}",
                self.message()
            ),
            _ => tracing::warn!(status = status.as_u16(), error = %self, "request rejected"),
        }

        (status, Json(MessageResponse::new(self.message()))).into_response()
    }
}
