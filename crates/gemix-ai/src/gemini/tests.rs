//! Tests for Gemini request building, chunk parsing, and wire behavior.

use futures_util::StreamExt;
use httpmock::prelude::*;

use super::client::{classify_http_error, parse_chunk};
use super::*;
use crate::{AiClient, AiError, FailureKind, Message, Role};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_model("gemini-test")
        .with_base_url(server.base_url());
    GeminiClient::new(config).unwrap()
}

fn chunk(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[test]
fn config_defaults_match_chat_screen() {
    let config = GeminiConfig::new("k");
    assert_eq!(config.model, "gemini-1.5-pro");
    assert_eq!(config.temperature, 0.9);
    assert_eq!(config.top_k, 1);
    assert_eq!(config.top_p, 1.0);
    assert_eq!(config.max_output_tokens, 2048);
}

#[test]
fn config_debug_redacts_key() {
    let config = GeminiConfig::new("super-secret");
    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let config = GeminiConfig::new("k").with_base_url("http://localhost:9/models/");
    assert_eq!(config.base_url, "http://localhost:9/models");
}

#[test]
fn request_body_maps_roles_and_generation_config() {
    let client = GeminiClient::new(GeminiConfig::new("k").with_top_k(3)).unwrap();
    let body = client.build_request_body(&[
        Message::new(Role::System, "be brief"),
        Message::new(Role::User, "hi"),
        Message::new(Role::Assistant, "hello"),
        Message::new(Role::User, "how are you?"),
    ]);

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "how are you?");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    assert_eq!(body["generationConfig"]["topK"], 3);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
}

#[test]
fn request_body_omits_system_instruction_when_absent() {
    let client = GeminiClient::new(GeminiConfig::new("k")).unwrap();
    let body = client.build_request_body(&[Message::new(Role::User, "hi")]);
    assert!(body.get("systemInstruction").is_none());
}

#[test]
fn parse_chunk_concatenates_parts() {
    let data = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": "Hel" }, { "text": "lo" }] } }]
    })
    .to_string();
    assert_eq!(parse_chunk(&data).unwrap().as_deref(), Some("Hello"));
}

#[test]
fn parse_chunk_without_text_is_none() {
    let data = r#"{"usageMetadata":{"promptTokenCount":3}}"#;
    assert_eq!(parse_chunk(data).unwrap(), None);
}

#[test]
fn parse_chunk_rejects_invalid_json() {
    assert!(matches!(parse_chunk("{oops"), Err(AiError::ParseError(_))));
}

#[test]
fn parse_chunk_classifies_embedded_errors() {
    let quota = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","message":"Quota exceeded"}}"#;
    let err = parse_chunk(quota).unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::QuotaExceeded);

    let internal = r#"{"error":{"code":500,"status":"INTERNAL","message":"boom"}}"#;
    let err = parse_chunk(internal).unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::Transient);
}

#[test]
fn http_errors_classify_by_status_and_body() {
    let err = classify_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
    assert!(matches!(err, AiError::QuotaExceeded(_)));

    let err = classify_http_error(
        reqwest::StatusCode::FORBIDDEN,
        r#"{"error":{"message":"Billing account is disabled"}}"#,
    );
    assert!(matches!(err, AiError::QuotaExceeded(_)));

    let err = classify_http_error(reqwest::StatusCode::BAD_REQUEST, "invalid argument");
    assert!(matches!(err, AiError::ApiError(ref m) if m.contains("400")));
}

#[tokio::test]
async fn streams_fragments_from_sse() {
    let server = MockServer::start_async().await;
    let body = format!(
        "data: {}\n\ndata: {}\n\ndata: {}\n\n",
        chunk("Hel"),
        r#"{"usageMetadata":{"candidatesTokenCount":2}}"#,
        chunk("lo")
    );
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/gemini-test:streamGenerateContent")
                .query_param("alt", "sse")
                .header("x-goog-api-key", "test-key");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(body);
        })
        .await;

    let client = client_for(&server);
    let stream = client
        .stream_message(&[Message::new(Role::User, "hi")])
        .await
        .unwrap();
    let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;

    mock.assert_async().await;
    assert_eq!(fragments, ["Hel", "lo"]);
}

#[tokio::test]
async fn too_many_requests_is_quota_exceeded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(429)
                .body(r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#);
        })
        .await;

    let client = client_for(&server);
    let result = client.stream_message(&[Message::new(Role::User, "hi")]).await;
    assert!(matches!(result, Err(AiError::QuotaExceeded(_))));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(503).body("unavailable");
        })
        .await;

    let client = client_for(&server);
    let result = client.stream_message(&[Message::new(Role::User, "hi")]).await;
    let err = result.err().unwrap();
    assert!(matches!(err, AiError::ApiError(_)));
    assert_eq!(err.failure_kind(), FailureKind::Transient);
}

#[tokio::test]
async fn error_inside_stream_ends_with_err_item() {
    let server = MockServer::start_async().await;
    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        chunk("partial"),
        r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","message":"quota"}}"#
    );
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).body(body);
        })
        .await;

    let client = client_for(&server);
    let items: Vec<_> = client
        .stream_message(&[Message::new(Role::User, "hi")])
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "partial");
    assert!(matches!(items[1], Err(AiError::QuotaExceeded(_))));
}
