//! Conversation session management.
//!
//! A `ConversationSession` owns the transcript of one dialogue, gates every
//! submission through a `RateGate`, and assembles the streamed reply into a
//! single assistant turn while reporting progress as `ReplyEvent`s.

mod chat;
mod manager;
mod types;


pub use manager::ConversationSession;
pub use types::{ReplyEvent, ReplyStream, Turn, TurnStatus};
