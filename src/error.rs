//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use thiserror::Error;

use crate::logic::command::CommandResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the push-channel HTTP server
#[derive(Debug, Error)]
pub enum AppError {
    /// Body could not be decoded into a command envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(reason) => {
                tracing::warn!("Rejected push command: {}", reason);
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(CommandResponse::failure(self.to_string()));
        (status, body).into_response()
    }
}

/// Outbound controller exchange failures
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Malformed config file {path}: {reason}")]
    Malformed { path: String, reason: String },
}
