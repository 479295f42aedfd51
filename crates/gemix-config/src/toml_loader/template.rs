//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Gemix Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
# name = "gemini-1.5-pro"
# api_key_env = "GEMINI_API_KEY"   # the key is read from this environment variable
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"

[generation]
# temperature = 0.9          # 0.0-2.0
# top_k = 1                  # >= 1
# top_p = 1.0                # 0.0-1.0
# max_output_tokens = 2048   # 1-8192

[rate_limit]
# window_secs = 60           # 1-86400
# max_requests = 10          # requests admitted per window
# quota_cooldown_secs = 300  # lockout after the API reports quota exhaustion

[session]
# greeting = "Hello, how can i help you today!"
# system_prompt = "You are a helpful assistant."

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
