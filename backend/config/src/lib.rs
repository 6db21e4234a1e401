//! `parley-config`: runtime configuration for parley.
//!
//! Provides:
//! - Typed config schema (logging, prompting, console identity)
//! - YAML loading from `PARLEY_CONFIG_DIR` or `~/.parley/`
//! - `PARLEY_*` environment overrides
//! - Default value application
//! - Validation with dotted-path messages

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use schema::{ConsoleConfig, LoggingConfig, ParleyConfig, PromptsConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{bail, Result};

/// Load a config file, apply env overrides and defaults, and validate.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<ParleyConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}
