//! Mock completion backends for testing.
//!
//! This crate provides implementations of [`CompletionClient`] that never
//! touch the network:
//! - `EchoBrain` - Echoes the last user message back
//! - `ScriptedBrain` - Replays queued replies and records every request
//! - `FailingBrain` - Always fails with a network error
//! - `DelayedBrain` - Wraps another backend with artificial delay
//!
//! For production use, see the `openai-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{ChatMessage, CompletionClient, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new();
//!     brain.push_reply("Hi there!");
//!
//!     let reply = brain.complete(&[ChatMessage::user("Hello")], 0.5).await?;
//!     assert_eq!(reply, "Hi there!");
//!     assert_eq!(brain.calls().len(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient, Role};

pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use scripted::{CompletionCall, ScriptedBrain};
