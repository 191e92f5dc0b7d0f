//! Configuration types for twilio-client.

use std::env;
use std::time::Duration;

use crate::error::TwilioError;

/// Default Twilio REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Configuration for talking to the Twilio Messages API.
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID, also the basic-auth username.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// Sending address (e.g., "whatsapp:+14155238886").
    pub from_number: String,
    /// API base URL, without the `/2010-04-01/...` suffix.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl TwilioConfig {
    /// Create a configuration against the public API.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at a different base URL (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Required: `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_PHONENUMBER`.
    /// Optional: `TWILIO_API_URL` (default: https://api.twilio.com).
    pub fn from_env() -> Result<Self, TwilioError> {
        let required = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| TwilioError::Config(format!("{} not set", name)))
        };

        let config = Self::new(
            required("TWILIO_ACCOUNT_SID")?,
            required("TWILIO_AUTH_TOKEN")?,
            required("TWILIO_PHONENUMBER")?,
        );

        Ok(match env::var("TWILIO_API_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        })
    }

    /// Get the message-creation endpoint URL.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
