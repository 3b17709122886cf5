//! Command-line interface: argument parsing, configuration merging and
//! the `serve`, `migrate` and `seed` command handlers.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::Settings;
use crate::config::error::ConfigError;
use crate::logger::{LoggerGuard, init_logger};

/// Load the configuration layers, then apply CLI overrides and validate.
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    ConfigurationMerger::from_cli(cli)?.merge_cli_args(cli)
}

/// Install the global subscriber described by `settings.logger`.
///
/// The returned guard flushes the file writer on drop; keep it alive in `main`.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LoggerGuard> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    Ok(init_logger(logger_config)?)
}
