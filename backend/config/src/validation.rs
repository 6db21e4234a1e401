//! Config validation with dotted-path messages.

use thiserror::Error;

use crate::schema::ParleyConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Waits longer than this get a warning.
const LONG_WAIT_SECS: u64 = 3600;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

pub fn validate(config: &ParleyConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_prompts(config, &mut report);
    validate_console(config, &mut report);
    report
}

/// A bare level, or a filter directive such as `parley_commands=debug`.
fn validate_logging(config: &ParleyConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        let bare = LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str());
        if !bare && !level.contains('=') {
            report.error(
                "logging.level",
                format!("Unknown log level '{level}'. Use one of {}", LOG_LEVELS.join(", ")),
            );
        }
    }
    if logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("logging.dir", "Log directory cannot be empty; omit it to log to the console only");
    }
}

fn validate_prompts(config: &ParleyConfig, report: &mut ValidationReport) {
    let Some(prompts) = &config.prompts else { return };
    if prompts.prompt_limit == Some(0) {
        report.warn(
            "prompts.promptLimit",
            "promptLimit is 0; arguments without a supplied value are cancelled without prompting",
        );
    }
    if let Some(wait) = prompts.default_wait_secs {
        if wait > LONG_WAIT_SECS {
            report.warn(
                "prompts.defaultWaitSecs",
                format!("Waiting {wait}s per reply keeps conversations blocked for a long time"),
            );
        }
    }
}

fn validate_console(config: &ParleyConfig, report: &mut ValidationReport) {
    let Some(console) = &config.console else { return };
    if console.user_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        report.error("console.userId", "Console user id cannot be empty");
    }
    if console.channel_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        report.error("console.channelId", "Console channel id cannot be empty");
    }
}
