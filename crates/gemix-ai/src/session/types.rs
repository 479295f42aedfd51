//! Session types and concurrency guards.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::Stream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{AiError, FailureKind, Role};

/// Events of one submission, in order. The last one is terminal.
pub type ReplyStream = Pin<Box<dyn Stream<Item = ReplyEvent> + Send>>;

/// Progress of a single submission as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    /// The full reply text so far. `in_progress == false` marks completion.
    Delta { text: String, in_progress: bool },
    /// The rate gate refused the request; nothing was sent.
    Rejected { retry_after: Duration },
    /// The remote failed. `partial` is whatever had streamed before.
    Failed { kind: FailureKind, partial: String },
    /// The caller cancelled. `partial` is whatever had streamed before.
    Cancelled { partial: String },
}

impl ReplyEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            ReplyEvent::Delta {
                in_progress: true,
                ..
            }
        )
    }

    /// Whole seconds to wait before retrying a rejected submission, rounded up.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ReplyEvent::Rejected { retry_after } => {
                let secs = retry_after.as_secs();
                Some(if retry_after.subsec_nanos() > 0 { secs + 1 } else { secs })
            }
            _ => None,
        }
    }
}

/// How an assistant turn came to be.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Complete,
    /// Reply cut short by the caller; the text is what had arrived.
    Cancelled,
    /// The text is a fixed notice, not model output. `partial` keeps
    /// whatever had streamed before the failure.
    Failed { kind: FailureKind, partial: String },
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub status: TurnStatus,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            status: TurnStatus::Complete,
        }
    }

    pub fn assistant(text: impl Into<String>, status: TurnStatus) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            status,
        }
    }

    /// Whether this assistant turn is real model output worth sending back as context.
    pub(crate) fn is_replayable(&self) -> bool {
        matches!(self.status, TurnStatus::Complete | TurnStatus::Cancelled)
    }
}

/// Mutable state shared between a session and its open reply stream.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) history: Vec<Turn>,
    /// The reply being assembled, if a stream is past the gate.
    pub(crate) active_reply: Option<String>,
    pub(crate) cancel: Option<CancellationToken>,
}

pub(crate) fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ownership of the session's single in-flight slot.
///
/// Created by `submit_turn` and moved into the reply stream. Dropping it
/// (stream finished, or abandoned mid-reply) promotes any half-built reply as
/// cancelled, forgets the cancellation token, and clears the `busy` flag.
pub(crate) struct InFlight {
    busy: Arc<AtomicBool>,
    state: Arc<Mutex<SessionState>>,
}

impl InFlight {
    /// Attempt to take the busy flag. Returns `Err` if already taken.
    pub(crate) fn acquire(
        busy: Arc<AtomicBool>,
        state: Arc<Mutex<SessionState>>,
    ) -> Result<Self, AiError> {
        if busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::SessionBusy);
        }
        Ok(Self { busy, state })
    }

    /// Start an empty reply.
    pub(crate) fn open_reply(&self) {
        lock_state(&self.state).active_reply = Some(String::new());
    }

    /// Append a fragment and return the accumulated text.
    pub(crate) fn append(&self, fragment: &str) -> String {
        let mut state = lock_state(&self.state);
        let reply = state.active_reply.get_or_insert_with(String::new);
        reply.push_str(fragment);
        reply.clone()
    }

    /// Promote the reply as a completed assistant turn and return its text.
    pub(crate) fn complete(&self) -> String {
        let mut state = lock_state(&self.state);
        let text = state.active_reply.take().unwrap_or_default();
        state
            .history
            .push(Turn::assistant(text.clone(), TurnStatus::Complete));
        text
    }

    /// Record a failure notice, carrying the partial text, and return that text.
    pub(crate) fn fail(&self, kind: FailureKind) -> String {
        let mut state = lock_state(&self.state);
        let partial = state.active_reply.take().unwrap_or_default();
        let status = TurnStatus::Failed {
            kind,
            partial: partial.clone(),
        };
        state.history.push(Turn::assistant(kind.notice(), status));
        partial
    }

    /// Keep whatever arrived as a cancelled turn and return it.
    pub(crate) fn cancel(&self) -> String {
        promote_cancelled(&mut lock_state(&self.state))
    }
}

fn promote_cancelled(state: &mut SessionState) -> String {
    let partial = state.active_reply.take().unwrap_or_default();
    if !partial.is_empty() {
        state
            .history
            .push(Turn::assistant(partial.clone(), TurnStatus::Cancelled));
    }
    partial
}

impl Drop for InFlight {
    fn drop(&mut self) {
        {
            let mut state = lock_state(&self.state);
            if state.active_reply.is_some() {
                debug!("reply stream dropped before completion");
                promote_cancelled(&mut state);
            }
            state.cancel = None;
        }
        self.busy.store(false, Ordering::Release);
    }
}
