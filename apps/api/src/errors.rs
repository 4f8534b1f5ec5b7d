use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::documents::ExtractionError;

/// Seconds clients are told to wait after a provider rate limit.
pub const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("API rate limit exceeded. Please wait 60 seconds and try again.")]
    RateLimited,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error envelope returned to clients: `{ "error": "...", "retryAfter": 60 }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, retry_after) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                self.to_string(),
                Some(RATE_LIMIT_RETRY_AFTER_SECS),
            ),
            AppError::Extraction(ExtractionError::Unsupported) => {
                (StatusCode::BAD_REQUEST, self.to_string(), None)
            }
            AppError::Extraction(e) => {
                tracing::error!("Upload error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to analyze resume".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            error: message,
            retry_after,
        });

        (status, body).into_response()
    }
}
