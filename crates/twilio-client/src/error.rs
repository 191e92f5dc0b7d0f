//! Error types for twilio-client.

use thiserror::Error;

/// Twilio error codes meaning the message itself was refused and could be
/// resent in a different form. 21617: concatenated body exceeds the length
/// limit.
pub const REJECTION_CODES: &[u32] = &[21617];

/// Errors that can occur when sending through Twilio.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The message content was refused.
    #[error("delivery rejected ({code}): {message}")]
    DeliveryRejected { code: u32, message: String },

    /// Any other error response from the API.
    #[error("API error {code} (HTTP {status}): {message}")]
    Api {
        code: u32,
        status: u16,
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TwilioError {
    /// Whether resending different content could succeed.
    pub fn is_rejection(&self) -> bool {
        matches!(self, TwilioError::DeliveryRejected { .. })
    }
}
