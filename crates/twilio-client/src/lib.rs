//! Twilio Messages API client library.
//!
//! This crate provides a small client for sending WhatsApp/SMS messages
//! through Twilio's REST API. It supports:
//!
//! - Sending text messages, optionally with media attachments
//! - Classifying rejected deliveries (e.g., body over the length limit)
//!
//! # Example
//!
//! ```no_run
//! use twilio_client::{SendParams, TwilioClient, TwilioConfig};
//!
//! # async fn example() -> Result<(), twilio_client::TwilioError> {
//! let client = TwilioClient::new(TwilioConfig::from_env()?)?;
//!
//! let result = client
//!     .send(SendParams::text("whatsapp:+27820000000", "Hello!"))
//!     .await?;
//! println!("Queued as {}", result.sid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TwilioClient;
pub use config::TwilioConfig;
pub use error::{TwilioError, REJECTION_CODES};
pub use types::{SendParams, SendResult};
