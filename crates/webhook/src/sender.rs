//! Twilio-backed message sender.

use async_trait::async_trait;
use orchestrator::{MessageSender, OrchestratorError};
use twilio_client::{SendParams, TwilioClient, TwilioError};

/// Delivers orchestrator replies through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioSender {
    client: TwilioClient,
}

impl TwilioSender {
    /// Create a new Twilio message sender.
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }
}

/// Keep content rejections distinguishable so the orchestrator can condense.
fn to_orchestrator_error(err: TwilioError) -> OrchestratorError {
    match err {
        TwilioError::DeliveryRejected { code, message } => {
            OrchestratorError::DeliveryRejected(format!("{}: {}", code, message))
        }
        other => OrchestratorError::SendFailed(other.to_string()),
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send_message(
        &self,
        recipient: &str,
        text: &str,
        media: &[String],
    ) -> Result<(), OrchestratorError> {
        let params = SendParams::text(recipient, text).with_media(media.iter().cloned());
        let result = self
            .client
            .send(params)
            .await
            .map_err(to_orchestrator_error)?;

        tracing::debug!("Twilio accepted message {}", result.sid);
        Ok(())
    }
}
