//! Interactive terminal front end.
//!
//! Reads lines from stdin, submits them to the session, and paints reply
//! events onto stdout as they arrive. Ctrl-C cancels a reply in flight and
//! quits at the prompt.

use std::io::{self, Write};

use futures_util::StreamExt;
use gemix_ai::{AiError, ConversationSession, ReplyEvent, Role, Turn, TurnStatus};
use gemix_common::GemixError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// One line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command<'a> {
    Empty,
    Exit,
    Clear,
    History,
    Say(&'a str),
}

impl<'a> Command<'a> {
    pub(crate) fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Command::Empty,
            "/exit" | "/quit" => Command::Exit,
            "/clear" => Command::Clear,
            "/history" => Command::History,
            _ => Command::Say(line.trim_end_matches(['\r', '\n'])),
        }
    }
}

/// Writes the conversation to a terminal-like sink.
pub(crate) struct Transcript<W: Write> {
    out: W,
    /// Bytes of the current reply already written.
    printed: usize,
}

impl<W: Write> Transcript<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub(crate) fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    pub(crate) fn print_turn(&mut self, turn: &Turn) -> io::Result<()> {
        let speaker = match turn.role {
            Role::User => "you",
            Role::Assistant | Role::System => "gemix",
        };
        if let TurnStatus::Failed { partial, .. } = &turn.status {
            if !partial.is_empty() {
                writeln!(self.out, "{speaker}> {partial}")?;
            }
        }
        writeln!(self.out, "{speaker}> {}", turn.text)
    }

    pub(crate) fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub(crate) fn begin_reply(&mut self) -> io::Result<()> {
        self.printed = 0;
        write!(self.out, "gemix> ")?;
        self.out.flush()
    }

    /// Paint one event. Deltas repeat the whole reply, so only the new suffix is written.
    pub(crate) fn render(&mut self, event: &ReplyEvent) -> io::Result<()> {
        match event {
            ReplyEvent::Delta { text, in_progress } => {
                let fresh = text.get(self.printed..).unwrap_or(text);
                write!(self.out, "{fresh}")?;
                self.printed = text.len();
                if !in_progress {
                    writeln!(self.out)?;
                }
            }
            ReplyEvent::Rejected { .. } => {
                let secs = event.retry_after_secs().unwrap_or_default();
                writeln!(self.out, "Rate limit reached. Try again in {secs} seconds.")?;
            }
            ReplyEvent::Failed { kind, .. } => {
                if self.printed > 0 {
                    writeln!(self.out)?;
                }
                writeln!(self.out, "{}", kind.notice())?;
            }
            ReplyEvent::Cancelled { .. } => {
                writeln!(self.out, " [cancelled]")?;
            }
        }
        self.out.flush()
    }
}

/// Run the read-submit-render loop until EOF, `/exit`, or Ctrl-C at the prompt.
pub(crate) async fn run(session: ConversationSession) -> Result<(), GemixError> {
    let mut transcript = Transcript::new(io::stdout());
    for turn in session.history() {
        transcript.print_turn(&turn)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        transcript.prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Exit => break,
            Command::Clear => match session.clear() {
                Ok(()) => transcript.notice("History cleared.")?,
                Err(e) => transcript.notice(&e.to_string())?,
            },
            Command::History => {
                for turn in session.history() {
                    transcript.print_turn(&turn)?;
                }
            }
            Command::Say(text) => stream_reply(&session, &mut transcript, text).await?,
        }
    }

    debug!("console closed");
    Ok(())
}

async fn stream_reply<W: Write>(
    session: &ConversationSession,
    transcript: &mut Transcript<W>,
    text: &str,
) -> Result<(), GemixError> {
    let mut stream = match session.submit_turn(text) {
        Ok(stream) => stream,
        Err(AiError::EmptyInput) => return Ok(()),
        Err(e) => {
            warn!("submission refused: {e}");
            transcript.notice(&e.to_string())?;
            return Ok(());
        }
    };

    transcript.begin_reply()?;
    loop {
        tokio::select! {
            event = stream.next() => match event {
                Some(event) => transcript.render(&event)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
            }
        }
    }
    Ok(())
}
