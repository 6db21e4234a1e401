//! Config defaults: fills in every unset value after loading.

use crate::schema::{ConsoleConfig, LoggingConfig, ParleyConfig, PromptsConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Matches the per-argument default wait.
pub const DEFAULT_WAIT_SECS: u64 = 30;

pub const DEFAULT_CONSOLE_USER: &str = "console-user";
pub const DEFAULT_CONSOLE_CHANNEL: &str = "console";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ParleyConfig) -> ParleyConfig {
    let config = apply_logging_defaults(config);
    let config = apply_prompt_defaults(config);
    apply_console_defaults(config)
}

fn apply_logging_defaults(mut config: ParleyConfig) -> ParleyConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

/// The prompt limit stays unset: no limit.
fn apply_prompt_defaults(mut config: ParleyConfig) -> ParleyConfig {
    let prompts = config.prompts.get_or_insert_with(PromptsConfig::default);
    if prompts.default_wait_secs.is_none() {
        prompts.default_wait_secs = Some(DEFAULT_WAIT_SECS);
    }
    config
}

fn apply_console_defaults(mut config: ParleyConfig) -> ParleyConfig {
    let console = config.console.get_or_insert_with(ConsoleConfig::default);
    if console.user_id.is_none() {
        console.user_id = Some(DEFAULT_CONSOLE_USER.to_string());
    }
    if console.channel_id.is_none() {
        console.channel_id = Some(DEFAULT_CONSOLE_CHANNEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(ParleyConfig::default());
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some(DEFAULT_LOG_LEVEL));
        let prompts = cfg.prompts.unwrap();
        assert_eq!(prompts.default_wait_secs, Some(DEFAULT_WAIT_SECS));
        assert_eq!(prompts.prompt_limit, None);
        assert_eq!(cfg.console.unwrap().channel_id.as_deref(), Some(DEFAULT_CONSOLE_CHANNEL));
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = ParleyConfig {
            prompts: Some(PromptsConfig { default_wait_secs: Some(5), prompt_limit: Some(2) }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.default_wait_secs(), 5);
        assert_eq!(cfg.prompt_limit(), Some(2));
    }
}
