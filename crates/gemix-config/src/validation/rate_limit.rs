//! Rate limit validation.

use crate::schema::GemixConfig;

use super::helpers::validate_range;

pub(crate) fn validate_rate_limit(errors: &mut Vec<String>, config: &GemixConfig) {
    let limits = &config.rate_limit;
    validate_range(errors, "rate_limit.window_secs", limits.window_secs, 1, 86_400);
    validate_range(
        errors,
        "rate_limit.max_requests",
        limits.max_requests.into(),
        1,
        10_000,
    );
    validate_range(
        errors,
        "rate_limit.quota_cooldown_secs",
        limits.quota_cooldown_secs,
        0,
        86_400,
    );
}
