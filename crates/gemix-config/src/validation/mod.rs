//! Full configuration validation.
//!
//! Validates numeric ranges and required strings. Each section has its own
//! submodule; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod generation;
mod helpers;
mod model;
mod rate_limit;

#[cfg(test)]
mod tests;

use crate::schema::GemixConfig;
use gemix_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GemixConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    model::validate_model(&mut errors, config);
    generation::validate_generation(&mut errors, config);
    rate_limit::validate_rate_limit(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
