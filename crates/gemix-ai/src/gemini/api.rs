//! AiClient trait implementation for GeminiClient.

use async_trait::async_trait;
use futures_util::{future, StreamExt};
use tracing::debug;

use crate::streaming::sse_events;
use crate::{AiClient, AiError, FragmentStream, Message};

use super::client::{classify_http_error, classify_transport_error, parse_chunk, GeminiClient};

#[async_trait]
impl AiClient for GeminiClient {
    async fn stream_message(&self, messages: &[Message]) -> Result<FragmentStream, AiError> {
        let body = self.build_request_body(messages);
        let url = self.stream_url();

        debug!(model = %self.config.model, messages = messages.len(), "Gemini API streaming request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status, &text));
        }

        let fragments = sse_events(response).filter_map(|event| {
            future::ready(match event {
                Ok(event) => parse_chunk(&event.data).transpose(),
                Err(e) => Some(Err(e)),
            })
        });

        Ok(Box::pin(fragments))
    }
}
