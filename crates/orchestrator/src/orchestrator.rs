//! Request boundary: load state, dispatch, persist, deliver.

use std::sync::Arc;

use brain_core::{CompletionClient, Role};
use database::UserUpdate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::DispatchConfig;
use crate::engine::{DispatchEngine, DispatchPath, Outcome, Persist};
use crate::error::OrchestratorError;
use crate::event::InboundEvent;
use crate::locks::SenderLocks;
use crate::replies;
use crate::sender::MessageSender;
use crate::store::UserStore;

/// Summary of one handled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Dispatch branch taken; `None` if the event failed before dispatch.
    pub path: Option<DispatchPath>,
    /// Replies the messaging channel accepted.
    pub delivered: usize,
    /// Whether the event ended in an error.
    pub failed: bool,
}

impl Report {
    fn failure() -> Self {
        Self {
            path: None,
            delivered: 0,
            failed: true,
        }
    }
}

/// Main orchestrator that coordinates message processing.
///
/// The orchestrator:
/// - Serializes events per sender
/// - Loads the sender's record, creating it on first contact
/// - Runs the [`DispatchEngine`] and persists its outcome
/// - Delivers the replies, condensing once if the platform rejects a body
pub struct Orchestrator {
    engine: DispatchEngine,
    store: Arc<dyn UserStore>,
    sender: Arc<dyn MessageSender>,
    locks: SenderLocks,
}

impl Orchestrator {
    /// Create an orchestrator with the given components.
    pub fn new(
        config: DispatchConfig,
        completions: Arc<dyn CompletionClient>,
        store: Arc<dyn UserStore>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            engine: DispatchEngine::new(config, completions),
            store,
            sender,
            locks: SenderLocks::new(),
        }
    }

    /// Get the dispatch engine.
    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// Handle an event, never failing.
    ///
    /// Errors are logged and answered with a best-effort generic reply.
    pub async fn handle(&self, event: InboundEvent) -> Report {
        let recipient = event.destination.clone();
        let sender_id = event.sender_id.clone();

        match self.process(event).await {
            Ok(report) => report,
            Err(err) => {
                error!(sender = %sender_id, "Failed to handle message: {}", err);

                let text = match err {
                    OrchestratorError::MalformedRequest(_) => None,
                    OrchestratorError::Upstream(_) => Some(replies::TRY_AGAIN),
                    _ => Some(replies::GENERIC_FAILURE),
                };
                if let Some(text) = text.filter(|_| !recipient.trim().is_empty()) {
                    if let Err(e) = self.sender.send_message(&recipient, text, &[]).await {
                        warn!("Failed to send failure notice to {}: {}", recipient, e);
                    }
                }

                Report::failure()
            }
        }
    }

    /// Process an event end-to-end.
    ///
    /// This method:
    /// 1. Validates the event
    /// 2. Waits for the sender's lock
    /// 3. Loads or creates the sender's record
    /// 4. Dispatches and sends the replies
    /// 5. Persists the outcome once every reply was accepted
    pub async fn process(&self, event: InboundEvent) -> Result<Report, OrchestratorError> {
        event.validate()?;

        let _guard = self.locks.acquire(&event.sender_id).await;
        info!(sender = %event.sender_id, "Processing message");

        let user = match self.store.find_by_id(&event.sender_id).await? {
            Some(user) => user,
            None => {
                let user = self.engine.new_user(&event);
                self.store.insert(&user).await?;
                info!(sender = %user.id, "Created user with balance {:.2}", user.balance);
                user
            }
        };

        let mut outcome = self.engine.handle(&event, user).await?;
        info!(sender = %event.sender_id, path = %outcome.path, "Dispatched");

        let delivered = self.deliver(&mut outcome).await?;
        self.persist(&event.sender_id, &outcome.persist).await?;

        Ok(Report {
            path: Some(outcome.path),
            delivered,
            failed: false,
        })
    }

    async fn persist(&self, id: &str, persist: &Persist) -> Result<(), OrchestratorError> {
        match persist {
            Persist::Nothing => Ok(()),
            Persist::Update(update) => self.store.update_fields(id, update).await,
            Persist::Delete => {
                info!(sender = %id, "Deleting user");
                self.store.delete(id).await
            }
            Persist::Feedback { content, update } => {
                self.store.record_feedback(id, content).await?;
                match update {
                    Some(update) => self.store.update_fields(id, update).await,
                    None => Ok(()),
                }
            }
        }
    }

    /// Send every reply in order, condensing rejected bodies once.
    async fn deliver(&self, outcome: &mut Outcome) -> Result<usize, OrchestratorError> {
        let mut delivered = 0;

        for index in 0..outcome.replies.len() {
            let reply = &outcome.replies[index];
            match self.sender.send(reply).await {
                Ok(()) => delivered += 1,
                Err(OrchestratorError::DeliveryRejected(reason)) => {
                    warn!("Reply to {} rejected ({}), condensing", reply.recipient, reason);
                    self.resend_condensed(outcome, index).await?;
                    delivered += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Delivered {} of {} replies", delivered, outcome.replies.len());
        Ok(delivered)
    }

    /// Shorten a rejected reply, send it once more, and make the pending
    /// history match what the user sees.
    async fn resend_condensed(
        &self,
        outcome: &mut Outcome,
        index: usize,
    ) -> Result<(), OrchestratorError> {
        let reply = &outcome.replies[index];
        let summary = self.engine.condense(&reply.text).await?;

        self.sender
            .send_message(&reply.recipient, &summary, &reply.media)
            .await?;

        if outcome.path == DispatchPath::Completion {
            if let Persist::Update(UserUpdate {
                messages: Some(ref mut messages),
                ..
            }) = outcome.persist
            {
                if let Some(last) = messages.last_mut().filter(|m| m.role == Role::Assistant) {
                    last.content = summary.clone();
                    outcome.user.messages = messages.clone();
                }
            }
        }
        outcome.replies[index].text = summary;

        Ok(())
    }
}
