use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GemixError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("missing api key: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("ai error: {0}")]
    Ai(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("generation.top_k = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: generation.top_k = 0 is out of range"
        );
    }

    #[test]
    fn gemix_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GemixError = config_err.into();
        assert!(matches!(err, GemixError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn gemix_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: GemixError = io_err.into();
        assert!(matches!(err, GemixError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn gemix_error_display() {
        let err = GemixError::MissingApiKey("GEMINI_API_KEY".into());
        assert_eq!(
            err.to_string(),
            "missing api key: environment variable GEMINI_API_KEY is not set"
        );

        let err = GemixError::Ai("model unavailable".into());
        assert_eq!(err.to_string(), "ai error: model unavailable");
    }
}
