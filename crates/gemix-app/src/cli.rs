use std::path::PathBuf;

use clap::Parser;

/// Gemix: chat with a hosted Gemini model from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gemix", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. `gemix=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Model name override.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// System prompt override.
    #[arg(short = 's', long)]
    pub system: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
