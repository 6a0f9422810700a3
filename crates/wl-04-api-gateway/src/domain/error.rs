//! API error with HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use shared_types::{ConfigurationError, ValidationError};
use wl_03_submission::RequestError;

/// A failed request as the caller sees it.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Malformed input: 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

/// Uniform error body: `{"success": false, "error": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        let status = match &err {
            RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::Configuration(ConfigurationError::SubmissionsDisabled { .. }) => {
                StatusCode::FORBIDDEN
            }
            RequestError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RequestError::Conflict { .. } => StatusCode::CONFLICT,
            RequestError::Store(_) | RequestError::Canonicalize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}
