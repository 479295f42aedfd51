//! Gemini API client struct, request building, and error classification.

use crate::{AiError, Message, Role};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn stream_url(&self) -> String {
        format!(
            "{}/{}:streamGenerateContent?alt=sse",
            self.config.base_url, self.config.model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let mut contents = Vec::new();

        for msg in messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
                Role::System => continue, // handled via systemInstruction
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content }]
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        });

        if let Some(system) = messages.iter().find(|msg| msg.role == Role::System) {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.content }]
            });
        }

        body
    }
}

/// Whether an error body or status names quota or billing exhaustion.
fn mentions_quota(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("resource_exhausted") || lower.contains("quota") || lower.contains("billing")
}

/// Classify a non-success HTTP response.
pub(crate) fn classify_http_error(status: reqwest::StatusCode, body: &str) -> AiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || mentions_quota(body) {
        AiError::QuotaExceeded(format!("HTTP {status}: {body}"))
    } else {
        AiError::ApiError(format!("HTTP {status}: {body}"))
    }
}

/// Classify an `error` object delivered inside the stream.
pub(crate) fn classify_stream_error(error: &serde_json::Value) -> AiError {
    let code = error["code"].as_u64().unwrap_or(0);
    let status = error["status"].as_str().unwrap_or("");
    let message = error["message"].as_str().unwrap_or("unknown error");

    if code == 429 || mentions_quota(status) || mentions_quota(message) {
        AiError::QuotaExceeded(format!("{status}: {message}"))
    } else {
        AiError::ApiError(format!("{code} {status}: {message}"))
    }
}

/// Classify a failure to reach the API at all.
pub(crate) fn classify_transport_error(error: reqwest::Error) -> AiError {
    if error.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(error.to_string())
    }
}

/// Text carried by one streamed chunk, or `None` if it carries none.
pub(crate) fn parse_chunk(data: &str) -> Result<Option<String>, AiError> {
    let json: serde_json::Value =
        serde_json::from_str(data).map_err(|e| AiError::ParseError(e.to_string()))?;

    if let Some(error) = json.get("error") {
        return Err(classify_stream_error(error));
    }

    let mut text = String::new();
    if let Some(candidates) = json["candidates"].as_array() {
        for candidate in candidates {
            if let Some(parts) = candidate["content"]["parts"].as_array() {
                for part in parts {
                    if let Some(t) = part["text"].as_str() {
                        text.push_str(t);
                    }
                }
            }
        }
    }

    Ok((!text.is_empty()).then_some(text))
}
