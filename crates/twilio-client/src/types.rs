//! Request and response types for the Messages API.

use serde::{Deserialize, Serialize};

/// Parameters for a single outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendParams {
    /// Destination address (e.g., "whatsapp:+27820000000").
    pub to: String,
    /// Message text.
    pub body: String,
    /// Publicly reachable media URLs to attach.
    #[serde(default)]
    pub media_urls: Vec<String>,
}

impl SendParams {
    /// A text-only message.
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            media_urls: Vec::new(),
        }
    }

    /// Attach media to the message.
    pub fn with_media<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_urls.extend(urls.into_iter().map(Into::into));
        self
    }

    /// Form fields in the order Twilio expects, one `MediaUrl` per attachment.
    pub(crate) fn form_fields<'a>(&'a self, from: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut fields = vec![("From", from), ("To", self.to.as_str()), ("Body", self.body.as_str())];
        fields.extend(self.media_urls.iter().map(|url| ("MediaUrl", url.as_str())));
        fields
    }
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Message SID assigned by Twilio.
    pub sid: String,
    /// Initial status (usually "queued").
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<u32>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_repeat_media() {
        let params = SendParams::text("whatsapp:+2782", "look")
            .with_media(["https://a.test/1.png", "https://a.test/2.png"]);

        let fields = params.form_fields("whatsapp:+1415");
        assert_eq!(
            fields,
            vec![
                ("From", "whatsapp:+1415"),
                ("To", "whatsapp:+2782"),
                ("Body", "look"),
                ("MediaUrl", "https://a.test/1.png"),
                ("MediaUrl", "https://a.test/2.png"),
            ]
        );
    }

    #[test]
    fn test_send_result_tolerates_extra_fields() {
        let json = r#"{"sid": "SM1", "status": "queued", "num_segments": "1"}"#;
        let result: SendResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.sid, "SM1");
        assert_eq!(result.status.as_deref(), Some("queued"));
    }
}
