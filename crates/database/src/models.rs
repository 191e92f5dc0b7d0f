//! Database models.

use brain_core::ChatMessage;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Current time in the format stored in timestamp columns.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A sender of inbound messages, identified by their platform id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Platform identifier (e.g., WhatsApp id "27821234567")
    pub id: String,
    /// Profile name reported by the platform at first contact
    pub display_name: Option<String>,
    /// Remaining credit
    pub balance: f64,
    /// Full conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Termination keyword awaiting confirmation
    pub pending_termination: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl User {
    /// Create a fresh record with an empty history.
    ///
    /// Negative opening balances are raised to zero.
    pub fn new(id: impl Into<String>, display_name: Option<String>, balance: f64) -> Self {
        let now = now_timestamp();
        Self {
            id: id.into(),
            display_name,
            balance: balance.max(0.0),
            messages: Vec::new(),
            pending_termination: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The most recent history entry, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Apply a partial update in memory, mirroring [`crate::user::update_user_fields`].
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(balance) = update.balance {
            self.balance = balance;
        }
        if let Some(ref messages) = update.messages {
            self.messages = messages.clone();
        }
        if let Some(ref pending) = update.pending_termination {
            self.pending_termination = pending.clone();
        }
        self.updated_at = now_timestamp();
    }
}

/// A partial update to a [`User`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New balance
    pub balance: Option<f64>,
    /// Replacement history
    pub messages: Option<Vec<ChatMessage>>,
    /// `Some(None)` clears the pending termination
    pub pending_termination: Option<Option<String>>,
}

impl UserUpdate {
    /// Update only the history.
    pub fn messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Some(messages),
            ..Self::default()
        }
    }

    /// Update only the balance.
    pub fn balance(balance: f64) -> Self {
        Self {
            balance: Some(balance),
            ..Self::default()
        }
    }

    /// Update balance and history together.
    pub fn balance_and_messages(balance: f64, messages: Vec<ChatMessage>) -> Self {
        Self {
            balance: Some(balance),
            messages: Some(messages),
            ..Self::default()
        }
    }

    /// Set or clear the pending termination keyword alongside the other fields.
    pub fn with_pending_termination(mut self, keyword: Option<String>) -> Self {
        self.pending_termination = Some(keyword);
        self
    }

    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.balance.is_none() && self.messages.is_none() && self.pending_termination.is_none()
    }
}

/// A piece of feedback left by a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Sender that left the feedback.
    pub user_id: String,
    /// Feedback text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}
