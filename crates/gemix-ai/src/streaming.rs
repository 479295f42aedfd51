//! Server-Sent Events (SSE) streaming parser.
//!
//! The Gemini API streams replies as SSE when asked with `alt=sse`. This
//! module turns a response body into a lazy stream of events so callers can
//! stop reading the moment they lose interest.

use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server sent an `event:` line.
    pub event: Option<String>,
    /// The event data (usually a JSON document).
    pub data: String,
}

/// Parse the body of a reqwest response into SSE events.
pub fn sse_events(response: reqwest::Response) -> impl Stream<Item = Result<SseEvent, AiError>> + Send {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    parse_sse(reader)
}

/// Parse SSE events from any buffered async reader.
pub fn parse_sse<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>> + Send
where
    R: AsyncBufRead + Unpin + Send,
{
    async_stream::try_stream! {
        let mut lines = reader.lines();
        let mut current_event: Option<String> = None;
        let mut current_data = String::new();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?
        {
            if line.is_empty() {
                // Empty line = end of event
                if !current_data.is_empty() {
                    yield SseEvent {
                        event: current_event.take(),
                        data: std::mem::take(&mut current_data),
                    };
                }
                current_event = None;
                continue;
            }

            if let Some(event_type) = field_value(&line, "event") {
                current_event = Some(event_type.to_string());
            } else if let Some(data) = field_value(&line, "data") {
                if !current_data.is_empty() {
                    current_data.push('\n');
                }
                current_data.push_str(data);
            }
            // Ignore other fields (id:, retry:, comments)
        }

        // Flush any remaining event
        if !current_data.is_empty() {
            yield SseEvent {
                event: current_event,
                data: current_data,
            };
        }
    }
}

/// Value of `name: value`, with at most one leading space removed.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(input: &'static str) -> Vec<SseEvent> {
        parse_sse(input.as_bytes())
            .map(|event| event.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn parses_data_events() {
        let events = collect("data: {\"a\":1}\n\ndata: {\"a\":2}\n\n").await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert_eq!(events[1].data, "{\"a\":2}");
        assert!(events[0].event.is_none());
    }

    #[tokio::test]
    async fn joins_multiline_data() {
        let events = collect("event: message\ndata: one\ndata: two\n\n").await;
        assert_eq!(
            events,
            vec![SseEvent {
                event: Some("message".into()),
                data: "one\ntwo".into(),
            }]
        );
    }

    #[tokio::test]
    async fn ignores_comments_and_unknown_fields() {
        let events = collect(": keepalive\nid: 7\nretry: 100\ndata:x\n\n").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[tokio::test]
    async fn handles_crlf_line_endings() {
        let events = collect("data: hello\r\n\r\ndata: world\r\n\r\n").await;
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["hello", "world"]);
    }

    #[tokio::test]
    async fn flushes_trailing_event_without_blank_line() {
        let events = collect("data: last").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "last");
    }

    #[tokio::test]
    async fn blank_lines_without_data_emit_nothing() {
        assert!(collect("\n\n\nevent: ping\n\n").await.is_empty());
    }

    #[test]
    fn field_value_strips_one_space() {
        assert_eq!(field_value("data:  x", "data"), Some(" x"));
        assert_eq!(field_value("data:x", "data"), Some("x"));
        assert_eq!(field_value("database: x", "data"), None);
    }
}
