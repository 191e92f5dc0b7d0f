//! Core trait and types for completion backends.
//!
//! This crate provides the shared interface between the dispatch core and
//! whichever text/image generation service sits behind it. It defines:
//!
//! - [`CompletionClient`] - The trait every completion backend implements
//! - [`ChatMessage`] / [`Role`] - Role-tagged conversation entries
//! - [`BrainError`] - Error types for completion operations
//! - [`context_window`] - Trailing window selection for conversation history
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl CompletionClient for Parrot {
//!     async fn complete(
//!         &self,
//!         messages: &[ChatMessage],
//!         _temperature: f32,
//!     ) -> Result<String, BrainError> {
//!         messages
//!             .last()
//!             .map(|m| m.content.clone())
//!             .ok_or(BrainError::EmptyResponse)
//!     }
//!
//!     async fn generate_image(&self, prompt: &str) -> Result<String, BrainError> {
//!         Ok(format!("https://example.invalid/{}.png", prompt.len()))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use history::{context_window, last_message, DEFAULT_CONTEXT_WINDOW};
pub use message::{ChatMessage, Role};
pub use prompt::{hash_prompt, short_fingerprint};
pub use trait_def::CompletionClient;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
