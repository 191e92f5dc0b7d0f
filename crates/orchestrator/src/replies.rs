//! Canned reply texts.

use crate::billing::format_balance;
use crate::config::DispatchConfig;

/// Reply when a completion or image request fails upstream.
pub const TRY_AGAIN: &str =
    "Something went wrong while generating your response, please resend your message.";

/// Reply when anything else fails.
pub const GENERIC_FAILURE: &str = "Sorry, something went wrong on our side. Please try again later.";

/// Reply after a confirmed termination.
pub const TERMINATED: &str =
    "Your account and conversation history have been deleted. Send any message to start again.";

/// Instructions for leaving feedback.
pub const FEEDBACK_HELP: &str =
    "I'd love to hear what you think. Send your feedback as *feedback: <your message>*.";

/// Acknowledgement for stored feedback.
pub const FEEDBACK_THANKS: &str = "Thank you, your feedback has been received.";

/// Hint for an `imagine:` message without a description.
pub const IMAGINE_HELP: &str =
    "Describe the image after the colon, for example *imagine: a red fox in the snow*.";

const MENU: &str = "Here are the available options:\n\n\
1. *Balance* - check your credit\n\
2. *Top up* - add credit\n\
3. *About* - what I can do\n\
4. *Feedback* - tell us what you think\n\
5. *Delete* - remove your account";

const INSTRUCTIONS: &str = "Ask me anything by sending a message and I'll do my best to answer. \
Start a message with *imagine:* to create an image. \
Every answer uses a little credit; send *balance* to check yours.";

/// Reply texts built from configuration.
#[derive(Debug, Clone)]
pub struct Replies {
    assistant_name: String,
    attribution: String,
    payment_link: String,
    currency_symbol: String,
}

impl Replies {
    /// Build reply texts from the dispatch configuration.
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            assistant_name: config.assistant_name.clone(),
            attribution: config.attribution.clone(),
            payment_link: config.payment_link.clone(),
            currency_symbol: config.currency_symbol.clone(),
        }
    }

    /// Options menu.
    pub fn menu(&self) -> String {
        MENU.to_string()
    }

    /// First part of the onboarding bundle: disclosure and menu.
    pub fn welcome(&self, name: &str) -> String {
        format!(
            "Hello {}! I'm *{}*, an AI assistant. My answers are generated by a language model, \
so please double-check anything important.\n\n{}",
            name, self.assistant_name, MENU
        )
    }

    /// Second part of the onboarding bundle: usage and attribution.
    pub fn instructions(&self) -> String {
        self.with_attribution(INSTRUCTIONS)
    }

    /// Description, usage and attribution.
    pub fn about(&self) -> String {
        self.with_attribution(&format!(
            "I'm *{}*, a smart assistant that can help with questions, writing and school work.\n\n{}",
            self.assistant_name, INSTRUCTIONS
        ))
    }

    /// Current balance.
    pub fn balance(&self, amount: f64) -> String {
        format!(
            "Your balance is *{}*.",
            format_balance(&self.currency_symbol, amount)
        )
    }

    /// Payment instructions.
    pub fn top_up(&self) -> String {
        format!(
            "To top up, make a card deposit at {} and *use your WhatsApp number as the reference*.",
            self.payment_link
        )
    }

    /// Refusal when the balance does not cover a request.
    pub fn no_balance(&self) -> String {
        format!("You don't have enough funds for this request. {}", self.top_up())
    }

    /// Ask the user to repeat a termination keyword.
    pub fn confirm_termination(&self, keyword: &str) -> String {
        format!(
            "Are you sure? Your account, balance and history will be permanently deleted. \
Send *{}* again to confirm.",
            keyword
        )
    }

    /// Caption for a generated image.
    pub fn image_caption(&self, prompt: &str) -> String {
        format!("Here's your image of \"{}\".", prompt)
    }

    fn with_attribution(&self, text: &str) -> String {
        if self.attribution.trim().is_empty() {
            text.to_string()
        } else {
            format!("{}\n\n{}", text, self.attribution)
        }
    }
}

/// Instruction sent with a reply that must be shortened.
pub fn condense_instruction(words: usize) -> String {
    format!(
        "Rewrite the following reply in at most {} words. Keep the key facts and answer only \
with the rewritten text.",
        words
    )
}
