//! Keyword dispatch: decides what a message gets and what changes.

use std::fmt;
use std::sync::Arc;

use brain_core::{context_window, short_fingerprint, ChatMessage, CompletionClient};
use database::{User, UserUpdate};
use serde::Serialize;
use tracing::{debug, info};

use crate::billing::{can_afford, deduct};
use crate::config::DispatchConfig;
use crate::error::OrchestratorError;
use crate::event::{InboundEvent, OutboundMessage};
use crate::keywords::{self, Command};
use crate::replies::{self, Replies};

/// Which branch of the dispatch table handled a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPath {
    Greeting,
    Balance,
    TopUp,
    About,
    Menu,
    FeedbackHelp,
    Feedback,
    TerminationPending,
    TerminationConfirmed,
    NoBalance,
    ImageHelp,
    Image,
    Completion,
}

impl DispatchPath {
    /// Stable snake_case name, as reported by the webhook.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Balance => "balance",
            Self::TopUp => "top_up",
            Self::About => "about",
            Self::Menu => "menu",
            Self::FeedbackHelp => "feedback_help",
            Self::Feedback => "feedback",
            Self::TerminationPending => "termination_pending",
            Self::TerminationConfirmed => "termination_confirmed",
            Self::NoBalance => "no_balance",
            Self::ImageHelp => "image_help",
            Self::Image => "image",
            Self::Completion => "completion",
        }
    }
}

impl fmt::Display for DispatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller must write back after a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Persist {
    Nothing,
    Update(UserUpdate),
    Delete,
    /// Store a feedback row for the sender, plus any user update.
    Feedback {
        content: String,
        update: Option<UserUpdate>,
    },
}

/// Result of dispatching one message.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub path: DispatchPath,
    pub replies: Vec<OutboundMessage>,
    /// User state after the dispatch, with `persist` already applied.
    pub user: User,
    pub persist: Persist,
}

impl Outcome {
    fn new(path: DispatchPath, user: User, persist: Persist) -> Self {
        Self {
            path,
            replies: Vec::new(),
            user,
            persist,
        }
    }

    fn reply(mut self, message: OutboundMessage) -> Self {
        self.replies.push(message);
        self
    }
}

/// Maps an inbound event and the sender's stored state to replies and a
/// persistence action.
///
/// The engine never touches storage or the messaging channel itself; it only
/// calls the completion backend for image and language-model paths.
pub struct DispatchEngine {
    config: DispatchConfig,
    replies: Replies,
    completions: Arc<dyn CompletionClient>,
}

impl DispatchEngine {
    /// Create an engine.
    pub fn new(config: DispatchConfig, completions: Arc<dyn CompletionClient>) -> Self {
        if let Some(ref prompt) = config.system_prompt {
            info!("System prompt fingerprint: {}", short_fingerprint(prompt));
        }
        info!(
            "Dispatch engine using {} (context window: {})",
            completions.name(),
            config.context_window
        );

        Self {
            replies: Replies::new(&config),
            config,
            completions,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Get the reply texts.
    pub fn replies(&self) -> &Replies {
        &self.replies
    }

    /// A fresh record for a first-time sender.
    pub fn new_user(&self, event: &InboundEvent) -> User {
        User::new(
            event.sender_id.clone(),
            event.display_name.clone(),
            self.config.default_balance,
        )
    }

    /// Dispatch one event against the sender's current state.
    ///
    /// Upstream failures are returned as errors with nothing to persist.
    pub async fn handle(
        &self,
        event: &InboundEvent,
        user: User,
    ) -> Result<Outcome, OrchestratorError> {
        let command = keywords::classify(&event.text);
        debug!("Classified message from {} as {:?}", event.sender_id, command);

        let reply = |text: String| OutboundMessage::reply_to(event, text);

        let outcome = match command {
            Command::Greeting => {
                let mut welcome = reply(self.replies.welcome(event.greeting_name()));
                if let Some(ref logo) = self.config.logo_url {
                    welcome = welcome.with_media(logo.clone());
                }
                Outcome::new(DispatchPath::Greeting, user, Persist::Nothing)
                    .reply(welcome)
                    .reply(reply(self.replies.instructions()))
            }
            Command::Balance => {
                let text = self.replies.balance(user.balance);
                Outcome::new(DispatchPath::Balance, user, Persist::Nothing).reply(reply(text))
            }
            Command::TopUp => Outcome::new(DispatchPath::TopUp, user, Persist::Nothing)
                .reply(reply(self.replies.top_up())),
            Command::About => Outcome::new(DispatchPath::About, user, Persist::Nothing)
                .reply(reply(self.replies.about())),
            Command::Menu => Outcome::new(DispatchPath::Menu, user, Persist::Nothing)
                .reply(reply(self.replies.menu())),
            Command::FeedbackHelp => {
                Outcome::new(DispatchPath::FeedbackHelp, user, Persist::Nothing)
                    .reply(reply(replies::FEEDBACK_HELP.to_string()))
            }
            Command::Feedback(content) => {
                let persist = Persist::Feedback {
                    content,
                    update: None,
                };
                Outcome::new(DispatchPath::Feedback, user, persist)
                    .reply(reply(replies::FEEDBACK_THANKS.to_string()))
            }
            Command::Terminate(keyword) => return Ok(self.terminate(event, user, &keyword)),
            Command::Imagine(prompt) => {
                let cost = self.config.pricing.required_cost(&event.text);
                if can_afford(user.balance, cost) {
                    self.imagine(event, user, &prompt).await?
                } else {
                    self.no_balance(event, user, cost)
                }
            }
            Command::Prompt => {
                let cost = self.config.pricing.required_cost(&event.text);
                if can_afford(user.balance, cost) {
                    self.complete(event, user, cost).await?
                } else {
                    self.no_balance(event, user, cost)
                }
            }
        };

        Ok(cancel_pending_termination(outcome))
    }

    /// Two-step termination: the same keyword twice in a row deletes.
    fn terminate(&self, event: &InboundEvent, mut user: User, keyword: &str) -> Outcome {
        let confirmed = user.pending_termination.as_deref() == Some(keyword);

        if confirmed {
            info!("Termination confirmed for {}", user.id);
            return Outcome::new(DispatchPath::TerminationConfirmed, user, Persist::Delete)
                .reply(OutboundMessage::reply_to(event, replies::TERMINATED));
        }

        let mut messages = user.messages.clone();
        messages.push(ChatMessage::user(event.text.clone()));
        let update =
            UserUpdate::messages(messages).with_pending_termination(Some(keyword.to_string()));
        user.apply(&update);

        Outcome::new(DispatchPath::TerminationPending, user, Persist::Update(update)).reply(
            OutboundMessage::reply_to(event, self.replies.confirm_termination(keyword)),
        )
    }

    fn no_balance(&self, event: &InboundEvent, user: User, cost: f64) -> Outcome {
        info!(
            "Refusing request from {}: balance {:.4} does not cover {:.4}",
            user.id, user.balance, cost
        );
        Outcome::new(DispatchPath::NoBalance, user, Persist::Nothing)
            .reply(OutboundMessage::reply_to(event, self.replies.no_balance()))
    }

    async fn imagine(
        &self,
        event: &InboundEvent,
        mut user: User,
        prompt: &str,
    ) -> Result<Outcome, OrchestratorError> {
        if prompt.is_empty() {
            return Ok(Outcome::new(DispatchPath::ImageHelp, user, Persist::Nothing)
                .reply(OutboundMessage::reply_to(event, replies::IMAGINE_HELP)));
        }

        let url = self.completions.generate_image(prompt).await?;

        let update = UserUpdate::balance(deduct(user.balance, self.config.pricing.image_cost));
        user.apply(&update);
        info!("Generated image for {}, balance now {:.4}", user.id, user.balance);

        let caption = OutboundMessage::reply_to(event, self.replies.image_caption(prompt)).with_media(url);
        Ok(Outcome::new(DispatchPath::Image, user, Persist::Update(update)).reply(caption))
    }

    async fn complete(
        &self,
        event: &InboundEvent,
        mut user: User,
        cost: f64,
    ) -> Result<Outcome, OrchestratorError> {
        let mut messages = user.messages.clone();
        messages.push(ChatMessage::user(event.text.clone()));

        let request = self.request_messages(&messages);
        let temperature = self.config.temperature.sample();
        debug!(
            "Requesting completion for {} with {} messages at temperature {}",
            user.id,
            request.len(),
            temperature
        );

        let answer = self.completions.complete(&request, temperature).await?;
        messages.push(ChatMessage::assistant(answer.clone()));

        let update = UserUpdate::balance_and_messages(deduct(user.balance, cost), messages);
        user.apply(&update);
        info!("Served prompt for {}, balance now {:.4}", user.id, user.balance);

        Ok(Outcome::new(DispatchPath::Completion, user, Persist::Update(update))
            .reply(OutboundMessage::reply_to(event, answer)))
    }

    /// Optional system prompt followed by the trailing history window.
    fn request_messages(&self, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let window = context_window(history, self.config.context_window);
        let mut request = Vec::with_capacity(window.len() + 1);
        if let Some(ref prompt) = self.config.system_prompt {
            request.push(ChatMessage::system(prompt.clone()));
        }
        request.extend_from_slice(window);
        request
    }

    /// Ask the completion backend to shorten a reply to the word budget.
    ///
    /// The result is clipped to the budget even if the backend overshoots.
    pub async fn condense(&self, text: &str) -> Result<String, OrchestratorError> {
        let request = [
            ChatMessage::system(replies::condense_instruction(self.config.summary_words)),
            ChatMessage::user(text.to_string()),
        ];
        let summary = self
            .completions
            .complete(&request, self.config.temperature.min())
            .await?;

        Ok(clip_words(summary.trim(), self.config.summary_words))
    }
}

/// Any message other than a termination keyword drops a pending termination.
fn cancel_pending_termination(mut outcome: Outcome) -> Outcome {
    if outcome.user.pending_termination.is_none() {
        return outcome;
    }
    debug!("Cancelling pending termination for {}", outcome.user.id);

    let clear = |update: UserUpdate| update.with_pending_termination(None);
    outcome.persist = match outcome.persist {
        Persist::Nothing => Persist::Update(clear(UserUpdate::default())),
        Persist::Update(update) => Persist::Update(clear(update)),
        Persist::Feedback { content, update } => Persist::Feedback {
            content,
            update: Some(clear(update.unwrap_or_default())),
        },
        Persist::Delete => Persist::Delete,
    };
    outcome.user.pending_termination = None;
    outcome
}

/// Keep at most `limit` whitespace-separated words.
fn clip_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        text.to_string()
    } else {
        words[..limit].join(" ")
    }
}
