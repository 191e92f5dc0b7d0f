//! Delayed brain implementation - wraps another backend with artificial delay.

use std::time::Duration;

use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient};
use tokio::time::sleep;

/// A backend that wraps another backend and adds artificial delay.
///
/// Useful for testing request serialization and simulating model latency.
pub struct DelayedBrain<B: CompletionClient> {
    inner: B,
    delay: Duration,
}

impl<B: CompletionClient> DelayedBrain<B> {
    /// Create a new DelayedBrain wrapping the given backend with the specified delay.
    pub fn new(inner: B, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a backend with a delay in milliseconds.
    pub fn with_millis(inner: B, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<B: CompletionClient> CompletionClient for DelayedBrain<B> {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.complete(messages, temperature).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.generate_image(prompt).await
    }

    fn name(&self) -> &str {
        "DelayedBrain"
    }
}
