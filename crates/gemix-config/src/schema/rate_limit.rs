//! Client-side request admission.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Length of the admission window in seconds (valid range: 1-86400).
    pub window_secs: u64,
    /// Requests admitted per window (valid range: 1-10000).
    pub max_requests: u32,
    /// Lockout after the remote reports quota exhaustion (valid range: 0-86400).
    pub quota_cooldown_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn quota_cooldown(&self) -> Duration {
        Duration::from_secs(self.quota_cooldown_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
            quota_cooldown_secs: 300,
        }
    }
}
