//! Client-side request admission.
//!
//! A fixed window admits at most `max_requests` requests; the window restarts
//! on the first call after it elapses. On top of the counter sits an
//! independent cooldown deadline, set when the remote reports quota
//! exhaustion, which denies everything until it passes.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Admission::Granted => None,
            Admission::Denied { retry_after } => Some(*retry_after),
        }
    }
}

#[derive(Debug, Default)]
struct GateState {
    request_count: u32,
    /// `None` until the first admission check.
    window_start: Option<Instant>,
    cooldown_until: Option<Instant>,
}

/// Admits or rejects outbound requests.
///
/// Each check-and-update happens under one lock, so a gate may be shared
/// (`Arc<RateGate>`) between sessions and tasks.
#[derive(Debug)]
pub struct RateGate {
    window: Duration,
    max_requests: u32,
    state: Mutex<GateState>,
}

impl RateGate {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            state: Mutex::new(GateState::default()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // The counters stay consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check admission at `now`, consuming one slot when granted.
    pub fn try_acquire(&self, now: Instant) -> Admission {
        let mut state = self.lock();

        if let Some(until) = state.cooldown_until {
            if now < until {
                let retry_after = until - now;
                debug!(?retry_after, "admission denied: quota cooldown");
                return Admission::Denied { retry_after };
            }
            state.cooldown_until = None;
        }

        let window_start = match state.window_start {
            Some(start) if now.saturating_duration_since(start) < self.window => start,
            _ => {
                state.window_start = Some(now);
                state.request_count = 0;
                now
            }
        };

        if state.request_count < self.max_requests {
            state.request_count += 1;
            return Admission::Granted;
        }

        let retry_after = (window_start + self.window).saturating_duration_since(now);
        debug!(?retry_after, count = state.request_count, "admission denied: window full");
        Admission::Denied { retry_after }
    }

    /// Deny every request until `now + duration`, regardless of the window counter.
    ///
    /// The counter is left untouched. An earlier deadline never shortens a later one.
    pub fn force_cooldown(&self, now: Instant, duration: Duration) {
        let until = now + duration;
        let mut state = self.lock();
        if state.cooldown_until.map_or(true, |current| current < until) {
            state.cooldown_until = Some(until);
        }
    }

    /// Whether a cooldown override is in force at `now`.
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.lock().cooldown_until.is_some_and(|until| now < until)
    }

    /// Admissions still available at `now` without consuming one.
    pub fn remaining(&self, now: Instant) -> u32 {
        let state = self.lock();
        if state.cooldown_until.is_some_and(|until| now < until) {
            return 0;
        }
        match state.window_start {
            Some(start) if now.saturating_duration_since(start) < self.window => {
                self.max_requests.saturating_sub(state.request_count)
            }
            _ => self.max_requests,
        }
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}
