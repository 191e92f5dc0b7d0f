//! OpenAI-compatible completion backend.
//!
//! This crate provides a [`CompletionClient`] that talks to any service
//! exposing the OpenAI chat-completions and image-generation endpoints.
//!
//! # Features
//!
//! - Chat completions with caller-chosen temperature
//! - Single square image generation returning a hosted URL
//! - Configurable via environment variables or a builder
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::{ChatMessage, CompletionClient, OpenAiBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     let reply = brain
//!         .complete(&[ChatMessage::user("Say hello")], 0.3)
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient, Role};
