/// Server error types
use crate::api::json::json_response;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Process-level failures returned to the binary
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Listener error: {0}")]
    Listener(#[source] std::io::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Shutdown error: {0}")]
    Shutdown(String),

    #[error("Storage error: {0}")]
    Storage(#[from] movieland_storage::StorageError),
}

/// Request-level failures rendered as HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// One or more validation rules failed
    #[error("bad request")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Anything not handled by the request itself
    #[error("{0}")]
    Internal(String),
}

/// Error text carried on a 500 response for the logging middleware
#[derive(Debug, Clone)]
pub struct InternalError(pub String);

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, errors) = match self {
            ApiError::Internal(err) => {
                let mut response = status.into_response();
                response.extensions_mut().insert(InternalError(err));
                return response;
            }
            ApiError::Validation(errors) => ("bad request".to_string(), errors),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                (msg, Vec::new())
            }
        };

        json_response(
            status,
            &ErrorBody {
                status: status.as_u16(),
                message,
                errors,
            },
        )
    }
}
