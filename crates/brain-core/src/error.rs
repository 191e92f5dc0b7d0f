//! Error types for completion operations.

use thiserror::Error;

/// Errors that can occur while talking to a completion backend.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The backend is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the backend or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status or an unreadable body.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The backend answered successfully but without any usable content.
    #[error("empty response from completion service")]
    EmptyResponse,
}
