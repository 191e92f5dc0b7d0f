//! Conversation history windowing.
//!
//! Stored histories are append-only and can grow without bound; only the
//! most recent entries are ever sent to a completion backend.

use crate::message::ChatMessage;

/// Default number of trailing messages sent as context.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// The trailing `size` entries of `messages`, oldest first.
///
/// Returns the whole slice when it is shorter than the window, and an empty
/// slice when `size` is zero.
///
/// # Example
///
/// ```rust
/// use brain_core::{context_window, ChatMessage};
///
/// let history = vec![
///     ChatMessage::user("one"),
///     ChatMessage::assistant("two"),
///     ChatMessage::user("three"),
/// ];
///
/// let window = context_window(&history, 2);
/// assert_eq!(window.len(), 2);
/// assert_eq!(window[0].content, "two");
/// ```
pub fn context_window(messages: &[ChatMessage], size: usize) -> &[ChatMessage] {
    let start = messages.len().saturating_sub(size);
    &messages[start..]
}

/// The most recent entry, if any.
pub fn last_message(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    messages.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("m{}", i))
                } else {
                    ChatMessage::assistant(format!("m{}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_window_shorter_history() {
        let history = numbered(3);
        assert_eq!(context_window(&history, 10).len(), 3);
    }

    #[test]
    fn test_window_keeps_most_recent_in_order() {
        let history = numbered(14);
        let window = context_window(&history, 10);

        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "m4");
        assert_eq!(window[9].content, "m13");
    }

    #[test]
    fn test_window_zero() {
        let history = numbered(4);
        assert!(context_window(&history, 0).is_empty());
    }

    #[test]
    fn test_last_message() {
        assert!(last_message(&[]).is_none());

        let history = numbered(2);
        assert_eq!(last_message(&history).unwrap().content, "m1");
    }
}
