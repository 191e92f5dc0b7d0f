//! Scripted brain implementation - replays queued replies.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use brain_core::{async_trait, BrainError, ChatMessage, CompletionClient};

/// Reply used when the completion queue is empty.
const DEFAULT_REPLY: &str = "scripted reply";

/// One recorded `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    /// Messages exactly as the caller sent them.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature the caller chose.
    pub temperature: f32,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<String, BrainError>>,
    images: VecDeque<Result<String, BrainError>>,
    calls: Vec<CompletionCall>,
    image_prompts: Vec<String>,
}

/// A backend that answers from queues and records what it was asked.
///
/// Completions pop from the reply queue, falling back to a fixed reply once
/// it is empty. Image generations pop from the image queue, falling back to
/// a URL derived from the prompt.
#[derive(Debug, Default)]
pub struct ScriptedBrain {
    script: Mutex<Script>,
}

impl ScriptedBrain {
    /// Create a backend with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with the given completion replies queued in order.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let brain = Self::new();
        for reply in replies {
            brain.push_reply(reply);
        }
        brain
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a successful completion.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script().replies.push_back(Ok(reply.into()));
    }

    /// Queue a failed completion.
    pub fn push_error(&self, error: BrainError) {
        self.script().replies.push_back(Err(error));
    }

    /// Queue a generated image URL.
    pub fn push_image(&self, url: impl Into<String>) {
        self.script().images.push_back(Ok(url.into()));
    }

    /// Queue a failed image generation.
    pub fn push_image_error(&self, error: BrainError) {
        self.script().images.push_back(Err(error));
    }

    /// Every `complete` call made so far.
    pub fn calls(&self) -> Vec<CompletionCall> {
        self.script().calls.clone()
    }

    /// Every image prompt received so far.
    pub fn image_prompts(&self) -> Vec<String> {
        self.script().image_prompts.clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, BrainError> {
        let mut script = self.script();
        script.calls.push(CompletionCall {
            messages: messages.to_vec(),
            temperature,
        });
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, BrainError> {
        let mut script = self.script();
        script.image_prompts.push(prompt.to_string());
        script
            .images
            .pop_front()
            .unwrap_or_else(|| Ok(format!("https://images.invalid/{}.png", prompt.len())))
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
