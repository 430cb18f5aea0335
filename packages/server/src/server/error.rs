//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::domains::transcription::SubmitError;
use crate::kernel::jobs::StoreError;

/// Errors surfaced by the HTTP routes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing or empty audio payload) → 400
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown job id, or an artifact requested before completion → 404
    #[error("not found")]
    NotFound,

    /// Anything else → 500; details are logged, not leaked
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::InvalidInput => ApiError::InvalidInput("No audio file provided".to_string()),
            SubmitError::Internal(e) => ApiError::Internal(e),
        }
    }
}
