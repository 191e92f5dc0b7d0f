//! Echo brain implementation - echoes the last user message back.

use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient, Role};

/// A backend that answers with the most recent user message.
///
/// Useful for exercising the message flow without any AI processing.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for EchoBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, BrainError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .ok_or(BrainError::EmptyResponse)?;

        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, last_user.content),
            None => last_user.content.clone(),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, BrainError> {
        Ok(format!("https://images.invalid/{}.png", prompt.len()))
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_no_prefix() {
        let brain = EchoBrain::new();
        let messages = vec![ChatMessage::user("Hello!"), ChatMessage::assistant("Hi")];

        let reply = brain.complete(&messages, 0.0).await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let brain = EchoBrain::with_prefix("Echo: ");
        let reply = brain
            .complete(&[ChatMessage::user("Hello!")], 0.0)
            .await
            .unwrap();
        assert_eq!(reply, "Echo: Hello!");
    }

    #[tokio::test]
    async fn test_echo_without_user_message() {
        let brain = EchoBrain::new();
        let result = brain.complete(&[ChatMessage::system("rules")], 0.0).await;
        assert!(matches!(result, Err(BrainError::EmptyResponse)));
    }

    #[test]
    fn test_brain_name() {
        assert_eq!(EchoBrain::new().name(), "EchoBrain");
    }
}
