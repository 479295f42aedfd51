//! ConversationSession struct and transcript management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gemix_common::SessionId;
use tracing::debug;

use crate::rate_gate::RateGate;
use crate::{AiClient, AiError, Message, Role};

use super::types::{lock_state, SessionState, Turn, TurnStatus};

const DEFAULT_QUOTA_COOLDOWN: Duration = Duration::from_secs(300);

/// One ongoing dialogue with a remote model.
///
/// Created once per conversation and discarded by its owner; there is no
/// explicit teardown. The transcript is exclusively owned by the session,
/// while the rate gate may be shared.
pub struct ConversationSession {
    pub(super) id: SessionId,
    pub(super) client: Arc<dyn AiClient>,
    pub(super) gate: Arc<RateGate>,
    /// System prompt (prepended to every API call).
    pub(super) system_prompt: Option<String>,
    /// How long the gate stays shut after the remote reports quota exhaustion.
    pub(super) quota_cooldown: Duration,
    pub(super) state: Arc<Mutex<SessionState>>,
    /// Whether a reply stream is currently open.
    pub(super) busy: Arc<AtomicBool>,
}

impl ConversationSession {
    pub fn new(client: Arc<dyn AiClient>, gate: Arc<RateGate>) -> Self {
        Self {
            id: SessionId::new(),
            client,
            gate,
            system_prompt: None,
            quota_cooldown: DEFAULT_QUOTA_COOLDOWN,
            state: Arc::new(Mutex::new(SessionState::default())),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Open the transcript with an assistant message. It is shown, never sent.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        lock_state(&self.state)
            .history
            .push(Turn::assistant(greeting, TurnStatus::Complete));
        self
    }

    pub fn with_quota_cooldown(mut self, cooldown: Duration) -> Self {
        self.quota_cooldown = cooldown;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Snapshot of the transcript, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        lock_state(&self.state).history.clone()
    }

    /// Text of the reply currently being assembled.
    pub fn active_reply(&self) -> Option<String> {
        lock_state(&self.state).active_reply.clone()
    }

    pub fn turn_count(&self) -> usize {
        lock_state(&self.state).history.len()
    }

    pub fn is_streaming(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Stop the open reply stream, if any. Returns whether there was one.
    ///
    /// The stream emits `ReplyEvent::Cancelled` on its next poll and ends.
    pub fn cancel(&self) -> bool {
        match lock_state(&self.state).cancel.as_ref() {
            Some(token) => {
                debug!(session = %self.id.short(), "cancelling reply stream");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Clear the transcript. Refused while a reply is streaming.
    pub fn clear(&self) -> Result<(), AiError> {
        if self.is_streaming() {
            return Err(AiError::SessionBusy);
        }
        lock_state(&self.state).history.clear();
        Ok(())
    }

    /// Context for the next request.
    ///
    /// Only exchanges that got a real reply are replayed: greetings, rejected
    /// or failed user turns, and failure notices are left out. The trailing
    /// unanswered user turn is the one being submitted.
    pub(crate) fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message::new(Role::System, system.clone()));
        }

        let state = lock_state(&self.state);
        let mut pending_user: Option<&Turn> = None;
        for turn in &state.history {
            match turn.role {
                Role::User => pending_user = Some(turn),
                Role::Assistant => {
                    if let Some(user) = pending_user.take() {
                        if turn.is_replayable() {
                            msgs.push(Message::new(Role::User, user.text.clone()));
                            msgs.push(Message::new(Role::Assistant, turn.text.clone()));
                        }
                    }
                }
                Role::System => {}
            }
        }
        if let Some(user) = pending_user {
            msgs.push(Message::new(Role::User, user.text.clone()));
        }
        msgs
    }
}
