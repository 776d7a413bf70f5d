//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::error::EngineError;

/// API error response body.
///
/// Carries `status: false` so clients reading the service envelope see a
/// failed call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub status: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: false,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// Engine error raised while mapping or validating
    Engine(EngineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => repository_response(e),
            AppError::Engine(EngineError::Repository(e)) => repository_response(e),
            AppError::Engine(e) => {
                let code = if e.is_validation() {
                    "VALIDATION_ERROR"
                } else {
                    "BAD_REQUEST"
                };
                (StatusCode::BAD_REQUEST, ApiError::new(code, e.to_string()))
            }
        };

        (status, Json(error)).into_response()
    }
}

fn repository_response(err: RepositoryError) -> (StatusCode, ApiError) {
    let msg = err.to_string();
    match err {
        RepositoryError::NotFound { .. } => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
        RepositoryError::ValidationError { .. } => {
            (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
        }
        RepositoryError::TimeoutError { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            ApiError::new("REPOSITORY_TIMEOUT", msg),
        ),
        ref e if e.is_retryable() => (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new("REPOSITORY_UNAVAILABLE", msg),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", msg),
        ),
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
