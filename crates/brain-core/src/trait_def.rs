//! The completion backend trait.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::ChatMessage;

/// A remote text and image generation service.
///
/// Implementations are constructed once at startup and shared behind an
/// `Arc`, so they must be `Send + Sync`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate the next assistant message for an ordered conversation.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, BrainError>;

    /// Generate one square image and return its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, BrainError>;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;
}
