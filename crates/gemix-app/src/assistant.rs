//! Wiring config into a live conversation session.

use std::sync::Arc;

use gemix_ai::{ConversationSession, GeminiClient, GeminiConfig, RateGate};
use gemix_common::GemixError;
use gemix_config::GemixConfig;

/// Gemini client settings from the model and generation sections.
pub(crate) fn gemini_config(config: &GemixConfig, api_key: String) -> GeminiConfig {
    let generation = &config.generation;
    GeminiConfig::new(api_key)
        .with_model(config.model.name.clone())
        .with_base_url(config.model.base_url.clone())
        .with_temperature(generation.temperature)
        .with_top_k(generation.top_k)
        .with_top_p(generation.top_p)
        .with_max_output_tokens(generation.max_output_tokens)
}

pub(crate) fn rate_gate(config: &GemixConfig) -> RateGate {
    RateGate::new(config.rate_limit.window(), config.rate_limit.max_requests)
}

fn api_key(config: &GemixConfig) -> Result<String, GemixError> {
    let var = &config.model.api_key_env;
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| GemixError::MissingApiKey(var.clone()))
}

/// Build the session the console talks to.
pub(crate) fn build_session(config: &GemixConfig) -> Result<ConversationSession, GemixError> {
    let client = GeminiClient::new(gemini_config(config, api_key(config)?))
        .map_err(|e| GemixError::Ai(e.to_string()))?;

    let mut session = ConversationSession::new(Arc::new(client), Arc::new(rate_gate(config)))
        .with_quota_cooldown(config.rate_limit.quota_cooldown());

    if let Some(ref prompt) = config.session.system_prompt {
        session = session.with_system_prompt(prompt.clone());
    }
    if let Some(ref greeting) = config.session.greeting {
        session = session.with_greeting(greeting.clone());
    }

    tracing::info!(
        session = %session.id().short(),
        model = %config.model.name,
        "session ready"
    );
    Ok(session)
}
