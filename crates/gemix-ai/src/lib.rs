//! AI engine for Gemix.
//!
//! Provides the streaming chat core:
//! - `RateGate`: fixed-window admission of outbound requests, with a
//!   cooldown override for remote quota exhaustion
//! - `ConversationSession`: owns one dialogue and turns each submission into
//!   a lazy stream of `ReplyEvent`s
//! - `GeminiClient`: the hosted model behind the `AiClient` capability,
//!   spoken to over SSE

pub mod gemini;
pub mod rate_gate;
pub mod session;
pub mod streaming;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use rate_gate::{Admission, RateGate};
pub use session::{ConversationSession, ReplyEvent, ReplyStream, Turn, TurnStatus};

/// Ordered text fragments of one reply. An `Err` item ends the reply.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

/// A remote model that streams its reply to a conversation.
///
/// `messages` is the full context, oldest first, ending with the new user turn.
/// An `Err` from the call itself means the request failed before any fragment arrived.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn stream_message(&self, messages: &[Message]) -> Result<FragmentStream, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Session is busy with another request")]
    SessionBusy,
    #[error("Message is empty")]
    EmptyInput,
}

impl AiError {
    /// How a remote failure is reported to the user.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AiError::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            _ => FailureKind::Transient,
        }
    }
}

/// Cause of a failed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The remote reported resource or billing exhaustion.
    QuotaExceeded,
    /// Any other transport or stream failure.
    Transient,
}

impl FailureKind {
    /// Fixed user-facing text recorded in place of the reply.
    pub fn notice(&self) -> &'static str {
        match self {
            FailureKind::QuotaExceeded => {
                "The model's usage quota has been exhausted. Please wait a few minutes before trying again."
            }
            FailureKind::Transient => "Sorry, there was an error. Please try again.",
        }
    }
}
