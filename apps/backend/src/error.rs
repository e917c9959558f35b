//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use matching_core::{DataError, SetupError};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Setup(#[from] SetupError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many active test sessions")]
    TooManySessions,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DataError> for ApiError {
    fn from(error: DataError) -> Self {
        Self::Setup(SetupError::DataUnavailable(error))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Setup(SetupError::InsufficientData { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data")
            }
            ApiError::Setup(SetupError::InvalidParameters(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_parameters")
            }
            ApiError::Setup(SetupError::NotStarted) => (StatusCode::CONFLICT, "not_started"),
            ApiError::Setup(SetupError::DataUnavailable(DataError::UnknownSubject(_))) => {
                (StatusCode::NOT_FOUND, "unknown_subject")
            }
            ApiError::Setup(SetupError::DataUnavailable(DataError::InvalidSubject(_))) => {
                (StatusCode::BAD_REQUEST, "invalid_subject")
            }
            ApiError::Setup(SetupError::DataUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "data_unavailable")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::TooManySessions => (StatusCode::SERVICE_UNAVAILABLE, "too_many_sessions"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
