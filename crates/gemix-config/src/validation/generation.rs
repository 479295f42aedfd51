//! Generation parameter validation (temperature, top_k, top_p, max_output_tokens).

use crate::schema::GemixConfig;

use super::helpers::{validate_range, validate_range_f64};

/// Validate all sampling constraints.
pub(crate) fn validate_generation(errors: &mut Vec<String>, config: &GemixConfig) {
    let generation = &config.generation;
    validate_range_f64(errors, "generation.temperature", generation.temperature, 0.0, 2.0);
    validate_range(errors, "generation.top_k", generation.top_k.into(), 1, u32::MAX.into());
    validate_range_f64(errors, "generation.top_p", generation.top_p, 0.0, 1.0);
    validate_range(
        errors,
        "generation.max_output_tokens",
        generation.max_output_tokens.into(),
        1,
        8192,
    );
}
