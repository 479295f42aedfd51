//! Configuration schema types for Gemix.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the values the chat screen has always used.

mod generation;
mod model;
mod rate_limit;
mod session;
mod system;

pub use generation::*;
pub use model::*;
pub use rate_limit::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Gemix.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GemixConfig {
    pub model: ModelConfig,
    pub generation: GenerationConfig,
    pub rate_limit: RateLimitConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}
