//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use docvault_core::CoreError;
use docvault_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "NOT_DURABLE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failed to initialize for this process (503).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The change was applied but could not be persisted (507).
    #[error("change applied but not saved: {0}")]
    NotDurable(String),

    /// The AI service call failed (502).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// No AI service is configured (503).
    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            ApiError::NotDurable(_) => (StatusCode::INSUFFICIENT_STORAGE, "NOT_DURABLE"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::AssistantUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ASSISTANT_UNAVAILABLE")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(code, error = %self, "request failed");
        }

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message: self.to_string(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::DuplicateKey { .. } => ApiError::Conflict(err.to_string()),
            StorageError::InvalidRecord(_) => ApiError::BadRequest(err.to_string()),
            StorageError::Init { .. } => ApiError::StorageUnavailable(err.to_string()),
            StorageError::Durability { .. } | StorageError::QuotaExceeded { .. } => {
                ApiError::NotDurable(format!(
                    "{}; the change may be lost when the store is reloaded",
                    err
                ))
            }
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}
