mod assistant;
mod cli;
mod console;

use std::process::ExitCode;

use gemix_common::GemixError;
use gemix_config::schema::LogLevel;
use gemix_config::GemixConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Current directory
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/gemix-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn env_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("ignoring invalid log directive {directive:?}: {e}");
            filter
        }
    }
}

/// `--log-level` wins; otherwise the `[logging]` level applies to gemix crates.
fn log_directive(cli: Option<&str>, level: LogLevel) -> String {
    cli.map(str::to_string)
        .unwrap_or_else(|| format!("gemix={}", level.as_filter()))
}

/// Start logging with a filter that can be swapped once config is read.
fn init_logging(directive: &str) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(env_filter(directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

async fn run(config: GemixConfig) -> Result<(), GemixError> {
    let session = assistant::build_session(&config)?;
    console::run(session).await
}

fn main() -> ExitCode {
    // Environment first; the runtime's worker threads must not race set_var
    load_dotenv();

    let args = cli::parse();

    let handle = init_logging(&log_directive(args.log_level.as_deref(), LogLevel::default()));

    tracing::info!("Gemix v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = gemix_config::load_config(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        GemixConfig::default()
    });

    if args.log_level.is_none() && config.logging.level != LogLevel::default() {
        let directive = log_directive(None, config.logging.level);
        if let Err(e) = handle.reload(env_filter(&directive)) {
            tracing::warn!("Failed to apply configured log level: {e}");
        }
    }
    if let Some(model) = args.model {
        config.model.name = model;
    }
    if let Some(system) = args.system {
        config.session.system_prompt = Some(system);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_log_level_overrides_config() {
        assert_eq!(
            log_directive(Some("gemix_ai=trace"), LogLevel::Error),
            "gemix_ai=trace"
        );
    }

    #[test]
    fn config_level_maps_to_gemix_directive() {
        assert_eq!(log_directive(None, LogLevel::default()), "gemix=info");
        assert_eq!(log_directive(None, LogLevel::Warning), "gemix=warn");
        assert_eq!(log_directive(None, LogLevel::Debug), "gemix=debug");
    }
}
