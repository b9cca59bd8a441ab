//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::message::ValidationError;
use chatrelay_core::messaging::MessagingError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        #[source]
        source: MessagingError,
    },
}

impl AppError {
    /// Wraps a backend failure with the generic message shown to callers.
    pub fn backend(context: &'static str, source: MessagingError) -> Self {
        AppError::Backend { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m, None),
            AppError::MalformedBody(m) => (
                StatusCode::BAD_REQUEST,
                "Malformed request body".to_string(),
                Some(m),
            ),
            AppError::PayloadTooLarge(m) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
                Some(m),
            ),
            AppError::UnsupportedMediaType(m) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported content type".to_string(),
                Some(m),
            ),
            AppError::Backend { context, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                context.to_string(),
                Some(source.to_string()),
            ),
        };
        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}
