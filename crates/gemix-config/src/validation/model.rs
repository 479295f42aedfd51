//! Model section validation (name, key variable, base URL).

use crate::schema::GemixConfig;

use super::helpers::validate_non_empty;

pub(crate) fn validate_model(errors: &mut Vec<String>, config: &GemixConfig) {
    validate_non_empty(errors, "model.name", &config.model.name);
    validate_non_empty(errors, "model.api_key_env", &config.model.api_key_env);

    let base_url = &config.model.base_url;
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(format!("model.base_url = {base_url:?} must be an http(s) URL"));
    }
}
