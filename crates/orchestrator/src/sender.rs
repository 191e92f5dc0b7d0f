//! Message sender trait and implementations.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::OrchestratorError;
use crate::event::OutboundMessage;

/// Trait for sending replies back through the messaging channel.
///
/// Abstracted to support different transports (Twilio, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message.
    ///
    /// # Arguments
    /// * `recipient` - Destination address
    /// * `text` - Message content
    /// * `media` - Media URLs to attach
    ///
    /// Returns [`OrchestratorError::DeliveryRejected`] when the platform
    /// refuses the content itself.
    async fn send_message(
        &self,
        recipient: &str,
        text: &str,
        media: &[String],
    ) -> Result<(), OrchestratorError>;

    /// Send an [`OutboundMessage`] (convenience wrapper).
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError> {
        self.send_message(&message.recipient, &message.text, &message.media)
            .await
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(
        &self,
        _recipient: &str,
        _text: &str,
        _media: &[String],
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(
        &self,
        recipient: &str,
        text: &str,
        media: &[String],
    ) -> Result<(), OrchestratorError> {
        tracing::info!(
            "Sending message to {} ({} media): {}",
            recipient,
            media.len(),
            text
        );
        Ok(())
    }
}

/// A sender that records every delivered message.
///
/// It can be told to reject long bodies, like the platform does, or to fail
/// every send.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
    max_chars: Option<usize>,
    fail_all: bool,
}

impl RecordingSender {
    /// Accept everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject bodies longer than `max_chars` characters.
    pub fn rejecting_over(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Self::default()
        }
    }

    /// Fail every send with [`OrchestratorError::SendFailed`].
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<OutboundMessage>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.log().clone()
    }

    /// Texts delivered so far.
    pub fn texts(&self) -> Vec<String> {
        self.log().iter().map(|m| m.text.clone()).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(
        &self,
        recipient: &str,
        text: &str,
        media: &[String],
    ) -> Result<(), OrchestratorError> {
        if self.fail_all {
            return Err(OrchestratorError::SendFailed("sender offline".to_string()));
        }
        if let Some(max) = self.max_chars {
            let length = text.chars().count();
            if length > max {
                return Err(OrchestratorError::DeliveryRejected(format!(
                    "body of {} chars exceeds {}",
                    length, max
                )));
            }
        }

        self.log().push(OutboundMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
            media: media.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sender() {
        let sender = NoOpSender;

        // Should not error
        sender.send_message("whatsapp:+1", "test", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sender() {
        let sender = LoggingSender;

        // Should not error
        sender.send_message("whatsapp:+1", "test", &[]).await.unwrap();
        sender
            .send(&OutboundMessage::text("whatsapp:+1", "pic").with_media("https://a/b.png"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_recording_sender_rejects_long_bodies() {
        let sender = RecordingSender::rejecting_over(5);

        sender.send_message("to", "short", &[]).await.unwrap();
        let err = sender.send_message("to", "too long", &[]).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::DeliveryRejected(_)));
        assert_eq!(sender.texts(), vec!["short"]);
    }

    #[tokio::test]
    async fn test_failing_sender() {
        let sender = RecordingSender::failing();
        assert!(matches!(
            sender.send_message("to", "hi", &[]).await,
            Err(OrchestratorError::SendFailed(_))
        ));
        assert!(sender.sent().is_empty());
    }
}
