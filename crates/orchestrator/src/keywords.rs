//! Keyword classification of inbound text.
//!
//! Matching is exact-phrase against fixed sets after [`normalize`]; only the
//! `imagine:` marker and the `feedback:` prefix look inside the text.

/// Greetings that trigger onboarding.
pub const GREETINGS: &[&str] = &[
    "hi",
    "hey",
    "hello",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Balance enquiries.
pub const BALANCE: &[&str] = &["check balance", "balance", "available balance"];

/// Top-up requests.
pub const TOP_UP: &[&str] = &["topup", "top up", "recharge", "restore"];

/// About/help requests.
pub const ABOUT: &[&str] = &["about", "help", "usage", "terms of usage"];

/// Account termination requests.
pub const TERMINATE: &[&str] = &["delete", "stop", "delete account", "terminate", "exit"];

/// Options menu requests.
pub const MENU: &[&str] = &["menu", "options"];

/// Marker that turns a message into an image request.
pub const IMAGINE_MARKER: &str = "imagine:";

const FEEDBACK: &str = "feedback";
const FEEDBACK_PREFIX: &str = "feedback:";

/// What an inbound message asks for, before any balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Greeting,
    Balance,
    TopUp,
    About,
    /// Termination keyword, normalized.
    Terminate(String),
    Menu,
    FeedbackHelp,
    /// Feedback text, trimmed and non-empty.
    Feedback(String),
    /// Image prompt, trimmed; may be empty.
    Imagine(String),
    /// Anything else goes to the language model.
    Prompt,
}

/// Normalize text for keyword comparison.
///
/// Trims, lowercases, collapses internal whitespace and strips one trailing
/// `.`, `!` or `?`.
pub fn normalize(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match collapsed.strip_suffix(|c: char| matches!(c, '.' | '!' | '?')) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => collapsed,
    }
}

/// Text after the first colon, trimmed.
fn after_first_colon(text: &str) -> &str {
    text.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

/// Classify inbound text. First match wins.
pub fn classify(text: &str) -> Command {
    let normalized = normalize(text);
    let is = |set: &[&str]| set.contains(&normalized.as_str());

    if is(GREETINGS) {
        Command::Greeting
    } else if is(BALANCE) {
        Command::Balance
    } else if is(TOP_UP) {
        Command::TopUp
    } else if is(ABOUT) {
        Command::About
    } else if is(TERMINATE) {
        Command::Terminate(normalized.clone())
    } else if is(MENU) {
        Command::Menu
    } else if normalized == FEEDBACK {
        Command::FeedbackHelp
    } else if normalized.starts_with(FEEDBACK_PREFIX) {
        match after_first_colon(text) {
            "" => Command::FeedbackHelp,
            content => Command::Feedback(content.to_string()),
        }
    } else if normalized.contains(IMAGINE_MARKER) {
        Command::Imagine(after_first_colon(text).to_string())
    } else {
        Command::Prompt
    }
}

/// Whether `text` is a termination keyword once normalized.
pub fn is_termination(text: &str) -> bool {
    TERMINATE.contains(&normalize(text).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  BALANCE  "), "balance");
        assert_eq!(normalize("Check   Balance."), "check balance");
        assert_eq!(normalize("hello!"), "hello");
        assert_eq!(normalize("hi !"), "hi");
        assert_eq!(normalize("why?!"), "why?");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_balance_variants() {
        for text in ["BALANCE", "balance", " balance ", "Balance.", "available balance"] {
            assert_eq!(classify(text), Command::Balance, "{:?}", text);
        }
    }

    #[test]
    fn test_exact_phrase_not_substring() {
        assert_eq!(classify("what is my balance"), Command::Prompt);
        assert_eq!(classify("Hi there, explain photosynthesis"), Command::Prompt);
        assert_eq!(classify("stop the war essay"), Command::Prompt);
    }

    #[test]
    fn test_keyword_sets() {
        assert_eq!(classify("Good Morning"), Command::Greeting);
        assert_eq!(classify("top up"), Command::TopUp);
        assert_eq!(classify("Recharge!"), Command::TopUp);
        assert_eq!(classify("help"), Command::About);
        assert_eq!(classify("terms of usage"), Command::About);
        assert_eq!(classify("options"), Command::Menu);
        assert_eq!(classify("Delete Account"), Command::Terminate("delete account".to_string()));
        assert_eq!(classify("EXIT."), Command::Terminate("exit".to_string()));
    }

    #[test]
    fn test_feedback() {
        assert_eq!(classify("Feedback"), Command::FeedbackHelp);
        assert_eq!(classify("feedback:"), Command::FeedbackHelp);
        assert_eq!(
            classify("Feedback: Love the quick answers!"),
            Command::Feedback("Love the quick answers!".to_string())
        );
    }

    #[test]
    fn test_imagine() {
        assert_eq!(
            classify("imagine: a red fox"),
            Command::Imagine("a red fox".to_string())
        );
        assert_eq!(
            classify("Please IMAGINE: A Red Fox"),
            Command::Imagine("A Red Fox".to_string())
        );
        assert_eq!(classify("imagine:"), Command::Imagine(String::new()));
        assert_eq!(classify("imagine a fox"), Command::Prompt);
    }

    #[test]
    fn test_is_termination() {
        assert!(is_termination(" Stop "));
        assert!(!is_termination("stop it"));
    }
}
