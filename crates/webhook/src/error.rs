//! Error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by webhook handlers.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request body is unreadable or misses a required field.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// The event reached the orchestrator but could not be handled.
    #[error("Processing failed")]
    Processing,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebhookError::Malformed(msg) => {
                tracing::warn!("Rejected webhook: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    serde_json::json!({ "status": "error", "message": msg }),
                )
            }
            WebhookError::Processing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "status": "error" }),
            ),
            WebhookError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "status": "error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for webhook handlers.
pub type Result<T> = std::result::Result<T, WebhookError>;
