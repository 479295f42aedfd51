//! Conversation defaults.

use serde::{Deserialize, Serialize};

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assistant message shown when a conversation opens. Not sent to the model.
    pub greeting: Option<String>,
    /// System instruction prepended to every request.
    pub system_prompt: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: Some("Hello, how can i help you today!".into()),
            system_prompt: None,
        }
    }
}
