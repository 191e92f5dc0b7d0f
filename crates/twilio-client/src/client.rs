//! Twilio Messages HTTP client.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::TwilioConfig;
use crate::error::{TwilioError, REJECTION_CODES};
use crate::types::{ApiErrorBody, SendParams, SendResult};

/// Client for the Twilio Messages API.
#[derive(Clone)]
pub struct TwilioClient {
    http: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    /// Create a client with the given configuration.
    pub fn new(config: TwilioConfig) -> Result<Self, TwilioError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TwilioError::Http)?;

        info!("Twilio client ready, sending as {}", config.from_number);

        Ok(Self { http, config })
    }

    /// Send a message.
    pub async fn send(&self, params: SendParams) -> Result<SendResult, TwilioError> {
        let url = self.config.messages_url();
        debug!(
            "Sending to {} ({} chars, {} media)",
            params.to,
            params.body.chars().count(),
            params.media_urls.len()
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params.form_fields(&self.config.from_number))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_error(status.as_u16(), &body);
            warn!("Send to {} failed: {}", params.to, err);
            return Err(err);
        }

        let result: SendResult = serde_json::from_str(&body)?;
        debug!("Queued message {} ({:?})", result.sid, result.status);
        Ok(result)
    }

    /// Send a text-only message.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<SendResult, TwilioError> {
        self.send(SendParams::text(to, body)).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }
}

/// Map an error response to a rejection or a generic API error.
fn classify_error(status: u16, body: &str) -> TwilioError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code).unwrap_or(0);
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_string());

    if REJECTION_CODES.contains(&code) {
        TwilioError::DeliveryRejected { code, message }
    } else {
        TwilioError::Api {
            code,
            status,
            message,
        }
    }
}

impl std::fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_length_rejection() {
        let body = r#"{"code": 21617, "message": "The concatenated message body exceeds the 1600 character limit.", "status": 400}"#;
        let err = classify_error(400, body);
        assert!(err.is_rejection());
        match err {
            TwilioError::DeliveryRejected { code, .. } => assert_eq!(code, 21617),
            other => panic!("Expected DeliveryRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_other_api_error() {
        let err = classify_error(401, r#"{"code": 20003, "message": "Authenticate", "status": 401}"#);
        assert!(!err.is_rejection());
        assert!(matches!(err, TwilioError::Api { code: 20003, status: 401, .. }));
    }

    #[test]
    fn test_classify_unparsable_body() {
        let err = classify_error(503, "Service Unavailable");
        match err {
            TwilioError::Api { code, message, .. } => {
                assert_eq!(code, 0);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("Expected Api, got {:?}", other),
        }
    }
}
