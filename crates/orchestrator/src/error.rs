//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling an inbound event.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The inbound event is missing a required field.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The messaging platform refused the message content.
    #[error("delivery rejected: {0}")]
    DeliveryRejected(String),

    /// Completion or image generation failed.
    #[error("upstream error: {0}")]
    Upstream(#[from] BrainError),

    /// Reading or writing user state failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<DatabaseError> for OrchestratorError {
    fn from(err: DatabaseError) -> Self {
        OrchestratorError::Storage(err.to_string())
    }
}
