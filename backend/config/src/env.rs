//! Environment overrides, applied on top of the config file.
//!
//! | Variable              | Field                     |
//! |-----------------------|---------------------------|
//! | `PARLEY_LOG_LEVEL`    | `logging.level`           |
//! | `PARLEY_PROMPT_LIMIT` | `prompts.promptLimit`     |
//! | `PARLEY_DEFAULT_WAIT` | `prompts.defaultWaitSecs` |
//!
//! Empty values are ignored. `PARLEY_PROMPT_LIMIT=none` clears the limit.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::{LoggingConfig, ParleyConfig, PromptsConfig};

pub const LOG_LEVEL_VAR: &str = "PARLEY_LOG_LEVEL";
pub const PROMPT_LIMIT_VAR: &str = "PARLEY_PROMPT_LIMIT";
pub const DEFAULT_WAIT_VAR: &str = "PARLEY_DEFAULT_WAIT";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: ParleyConfig) -> Result<ParleyConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: ParleyConfig,
    env: &HashMap<String, String>,
) -> Result<ParleyConfig> {
    let var = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(level) = var(LOG_LEVEL_VAR) {
        debug!(var = LOG_LEVEL_VAR, value = %level, "Config override from env");
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }

    if let Some(limit) = var(PROMPT_LIMIT_VAR) {
        debug!(var = PROMPT_LIMIT_VAR, value = %limit, "Config override from env");
        let limit = if limit.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(limit.parse::<usize>().with_context(|| {
                format!("{PROMPT_LIMIT_VAR} must be a non-negative integer or \"none\", got \"{limit}\"")
            })?)
        };
        config.prompts.get_or_insert_with(PromptsConfig::default).prompt_limit = limit;
    }

    if let Some(wait) = var(DEFAULT_WAIT_VAR) {
        debug!(var = DEFAULT_WAIT_VAR, value = %wait, "Config override from env");
        let secs = wait.parse::<u64>().with_context(|| {
            format!("{DEFAULT_WAIT_VAR} must be a whole number of seconds, got \"{wait}\"")
        })?;
        config.prompts.get_or_insert_with(PromptsConfig::default).default_wait_secs = Some(secs);
    }

    Ok(config)
}
