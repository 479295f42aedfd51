//! Sampling parameters forwarded with every request.

use serde::{Deserialize, Serialize};

/// Generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Top-k sampling (valid range: >= 1).
    pub top_k: u32,
    /// Nucleus sampling (valid range: 0.0-1.0).
    pub top_p: f64,
    /// Reply length cap in tokens (valid range: 1-8192).
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}
