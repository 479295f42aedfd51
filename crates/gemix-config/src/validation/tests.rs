//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = GemixConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = GemixConfig::default();
    config.generation.temperature = 2.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.temperature"));
}

#[test]
fn catches_nan_temperature() {
    let mut config = GemixConfig::default();
    config.generation.temperature = f64::NAN;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.temperature"));
}

#[test]
fn catches_top_k_zero() {
    let mut config = GemixConfig::default();
    config.generation.top_k = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.top_k"));
}

#[test]
fn catches_top_p_above_one() {
    let mut config = GemixConfig::default();
    config.generation.top_p = 1.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.top_p"));
}

#[test]
fn catches_max_output_tokens_too_large() {
    let mut config = GemixConfig::default();
    config.generation.max_output_tokens = 100_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.max_output_tokens"));
}

#[test]
fn catches_zero_window() {
    let mut config = GemixConfig::default();
    config.rate_limit.window_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.window_secs"));
}

#[test]
fn catches_zero_max_requests() {
    let mut config = GemixConfig::default();
    config.rate_limit.max_requests = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.max_requests"));
}

#[test]
fn zero_quota_cooldown_is_allowed() {
    let mut config = GemixConfig::default();
    config.rate_limit.quota_cooldown_secs = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_empty_model_name() {
    let mut config = GemixConfig::default();
    config.model.name = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.name must not be empty"));
}

#[test]
fn catches_non_http_base_url() {
    let mut config = GemixConfig::default();
    config.model.base_url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.base_url"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = GemixConfig::default();
    config.generation.top_k = 0;
    config.rate_limit.max_requests = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("generation.top_k"));
    assert!(err.contains("rate_limit.max_requests"));
    assert!(err.contains("; "));
}
