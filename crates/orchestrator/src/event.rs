//! Inbound events and outbound replies.

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// One inbound message as delivered by the platform webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Stable sender identifier (WhatsApp id).
    pub sender_id: String,
    /// Profile name, if the platform sent one.
    pub display_name: Option<String>,
    /// Raw message text.
    pub text: String,
    /// Address replies are sent to (e.g., "whatsapp:+27820000000").
    pub destination: String,
}

impl InboundEvent {
    /// Create a new event.
    pub fn new(
        sender_id: impl Into<String>,
        display_name: Option<String>,
        text: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            display_name,
            text: text.into(),
            destination: destination.into(),
        }
    }

    /// Check that every required field is present and non-blank.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        for (field, value) in [
            ("sender id", &self.sender_id),
            ("text", &self.text),
            ("destination", &self.destination),
        ] {
            if value.trim().is_empty() {
                return Err(OrchestratorError::MalformedRequest(format!(
                    "missing {}",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Name to greet the sender by.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("there")
    }
}

/// A reply to send back through the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Destination address.
    pub recipient: String,
    /// Message text.
    pub text: String,
    /// Media URLs to attach.
    #[serde(default)]
    pub media: Vec<String>,
}

impl OutboundMessage {
    /// A text-only reply.
    pub fn text(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
            media: Vec::new(),
        }
    }

    /// Reply to the event's destination.
    pub fn reply_to(event: &InboundEvent, text: impl Into<String>) -> Self {
        Self::text(event.destination.clone(), text)
    }

    /// Attach one media URL.
    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.media.push(url.into());
        self
    }
}
