//! Submitting a user turn and streaming the reply.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::rate_gate::{Admission, RateGate};
use crate::{AiError, FailureKind, FragmentStream};

use super::manager::ConversationSession;
use super::types::{lock_state, InFlight, ReplyEvent, ReplyStream, Turn};

/// Outcome of waiting on the remote while watching for cancellation.
enum Step<T> {
    Ready(T),
    Cancelled,
}

async fn until_cancelled<T>(
    token: &CancellationToken,
    fut: impl std::future::Future<Output = T>,
) -> Step<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Step::Cancelled,
        value = fut => Step::Ready(value),
    }
}

/// Classify a remote failure, shutting the gate for `cooldown` on quota exhaustion.
fn apply_failure(gate: &RateGate, cooldown: Duration, error: &AiError) -> FailureKind {
    let kind = error.failure_kind();
    if kind == FailureKind::QuotaExceeded {
        warn!(?cooldown, "remote quota exhausted, closing rate gate");
        gate.force_cooldown(Instant::now(), cooldown);
    }
    kind
}

impl ConversationSession {
    /// Append a user turn and stream the assistant's reply.
    ///
    /// Fails fast with `EmptyInput` for blank text (nothing is recorded and the
    /// gate is not consulted) and with `SessionBusy` while a previous stream is
    /// still open. Otherwise the user turn is recorded at once and the returned
    /// stream, when polled, checks the rate gate, forwards the conversation to
    /// the remote model, and yields progress ending in exactly one terminal
    /// event. Remote failures never surface as errors; they become
    /// `ReplyEvent::Failed`.
    pub fn submit_turn(&self, text: impl Into<String>) -> Result<ReplyStream, AiError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AiError::EmptyInput);
        }

        let in_flight = InFlight::acquire(Arc::clone(&self.busy), Arc::clone(&self.state))?;
        let token = CancellationToken::new();
        {
            let mut state = lock_state(&self.state);
            state.history.push(Turn::user(text));
            state.cancel = Some(token.clone());
        }

        let messages = self.build_messages();
        let client = Arc::clone(&self.client);
        let gate = Arc::clone(&self.gate);
        let quota_cooldown = self.quota_cooldown;
        let session = self.id.short().to_string();

        let stream = async_stream::stream! {
            let in_flight = in_flight;

            if token.is_cancelled() {
                yield ReplyEvent::Cancelled { partial: in_flight.cancel() };
                return;
            }

            if let Admission::Denied { retry_after } = gate.try_acquire(Instant::now()) {
                warn!(%session, ?retry_after, "submission rejected by rate gate");
                yield ReplyEvent::Rejected { retry_after };
                return;
            }

            in_flight.open_reply();
            debug!(%session, messages = messages.len(), "opening reply stream");

            let opened = until_cancelled(&token, client.stream_message(&messages)).await;
            let mut fragments: FragmentStream = match opened {
                Step::Cancelled => {
                    info!(%session, "reply cancelled before first fragment");
                    yield ReplyEvent::Cancelled { partial: in_flight.cancel() };
                    return;
                }
                Step::Ready(Err(e)) => {
                    warn!(%session, error = %e, "reply failed to start");
                    let kind = apply_failure(&gate, quota_cooldown, &e);
                    yield ReplyEvent::Failed { kind, partial: in_flight.fail(kind) };
                    return;
                }
                Step::Ready(Ok(fragments)) => fragments,
            };

            let mut count = 0usize;
            loop {
                match until_cancelled(&token, fragments.next()).await {
                    Step::Cancelled => {
                        let partial = in_flight.cancel();
                        info!(%session, fragments = count, chars = partial.len(), "reply cancelled");
                        yield ReplyEvent::Cancelled { partial };
                        return;
                    }
                    Step::Ready(Some(Ok(fragment))) => {
                        count += 1;
                        let text = in_flight.append(&fragment);
                        yield ReplyEvent::Delta { text, in_progress: true };
                    }
                    Step::Ready(Some(Err(e))) => {
                        warn!(%session, error = %e, fragments = count, "reply stream failed");
                        let kind = apply_failure(&gate, quota_cooldown, &e);
                        yield ReplyEvent::Failed { kind, partial: in_flight.fail(kind) };
                        return;
                    }
                    Step::Ready(None) => {
                        let text = in_flight.complete();
                        info!(%session, fragments = count, chars = text.len(), "reply complete");
                        yield ReplyEvent::Delta { text, in_progress: false };
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
