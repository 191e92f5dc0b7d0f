//! Keyword dispatch, billing and request handling for the conversational relay.
//!
//! This crate provides the [`Orchestrator`] type which turns one inbound
//! webhook event into replies and an updated user record.
//!
//! # Features
//!
//! - Classifies inbound text against fixed keyword sets
//! - Charges prompts by length and images at a flat price, never below zero
//! - Forwards everything else to a completion backend with a trailing
//!   history window
//! - Two-step account termination
//! - Serializes events per sender
//!
//! # Architecture
//!
//! ```text
//! Inbound webhook (from the webhook crate)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Validate event, acquire the sender's lock               │
//! │         ↓                                                   │
//! │  2. Load user (or create with the opening credit)           │
//! │         ↓                                                   │
//! │  3. DispatchEngine::handle → Outcome                        │
//! │     • keyword reply (greeting, balance, top up, ...)        │
//! │     • balance gate                                          │
//! │     • image generation / language-model completion         │
//! │         ↓                                                   │
//! │  4. Persist (update, delete, feedback)                      │
//! │         ↓                                                   │
//! │  5. Send replies (condense and resend once if rejected)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::{DispatchConfig, InboundEvent, InMemoryUserStore, LoggingSender, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(
//!     DispatchConfig::from_env()?,
//!     Arc::new(openai_brain::OpenAiBrain::from_env()?),
//!     Arc::new(InMemoryUserStore::new()),
//!     Arc::new(LoggingSender),
//! );
//!
//! let event = InboundEvent::new("27820000000", None, "balance", "whatsapp:+27820000000");
//! let report = orchestrator.handle(event).await;
//! println!("Handled via {:?}", report.path);
//! ```

pub mod billing;
mod config;
mod engine;
mod error;
mod event;
pub mod keywords;
mod locks;
mod orchestrator;
pub mod replies;
mod sender;
mod store;

// Public exports
pub use billing::{Pricing, TemperatureRange};
pub use config::{DispatchConfig, DispatchConfigBuilder, DEFAULT_BALANCE, DEFAULT_SUMMARY_WORDS};
pub use engine::{DispatchEngine, DispatchPath, Outcome, Persist};
pub use error::OrchestratorError;
pub use event::{InboundEvent, OutboundMessage};
pub use keywords::Command;
pub use locks::{SenderGuard, SenderLocks};
pub use orchestrator::{Orchestrator, Report};
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender};
pub use store::{InMemoryUserStore, UserStore};

// Re-export commonly used types from dependencies
pub use brain_core::{ChatMessage, CompletionClient, Role};
pub use database::{User, UserUpdate};
