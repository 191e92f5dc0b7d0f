//! Failing brain implementation - every call errors.

use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient};

/// A backend whose every call fails with [`BrainError::Network`].
#[derive(Debug, Clone)]
pub struct FailingBrain {
    reason: String,
}

impl FailingBrain {
    /// Create a failing backend with a default reason.
    pub fn new() -> Self {
        Self::with_reason("connection refused")
    }

    /// Create a failing backend with a custom reason.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for FailingBrain {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, BrainError> {
        Err(BrainError::Network(self.reason.clone()))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, BrainError> {
        Err(BrainError::Network(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::with_reason("down");

        let err = brain.complete(&[], 0.0).await.unwrap_err();
        assert_eq!(err.to_string(), "network error: down");
        assert!(brain.generate_image("fox").await.is_err());
    }
}
