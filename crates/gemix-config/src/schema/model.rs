//! Remote model selection.

use serde::{Deserialize, Serialize};

/// Which hosted model to talk to and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name as the API knows it.
    pub name: String,
    /// Environment variable holding the API key. The key itself never lives in the file.
    pub api_key_env: String,
    /// Base URL of the models endpoint.
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-1.5-pro".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
        }
    }
}
