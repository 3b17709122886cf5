//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output in Full, Compact or JSON format
//! - Time-based file rotation through `tracing-appender`
//!
//! File output goes through a non-blocking writer; the returned
//! [`LoggerGuard`] must stay alive for buffered lines to be flushed.

pub mod config;
pub mod error;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writer running.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggerGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<LoggerGuard, LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    // File layer goes first so console ANSI settings never leak into span
    // fields written to the file.
    if config.file.enabled {
        let appender = build_file_appender(&config.file)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);
        layers.push(file_layer(config.file.format, writer));
    }

    if config.console.enabled {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::subscriber(e.to_string()))?;

    Ok(LoggerGuard { _file: file_guard })
}

fn build_file_appender(config: &FileConfig) -> Result<RollingFileAppender, LoggerError> {
    std::fs::create_dir_all(&config.directory)?;

    RollingFileAppender::builder()
        .rotation(config.rotation.to_appender_rotation())
        .filename_prefix(&config.file_name)
        .build(&config.directory)
        .map_err(|e| {
            LoggerError::config(format!(
                "Cannot open log file in '{}': {}",
                config.directory.display(),
                e
            ))
        })
}

fn file_layer(format: LogFormat, writer: NonBlocking) -> BoxedLayer {
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_appender_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            enabled: true,
            directory: temp_dir.path().join("nested").join("logs"),
            file_name: "vcard.log".to_string(),
            format: LogFormat::Json,
            rotation: Rotation::Never,
        };

        let mut appender = build_file_appender(&config).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let written = std::fs::read_to_string(config.directory.join("vcard.log")).unwrap();
        assert_eq!(written, "hello\n");
    }

    #[test]
    fn test_init_rejects_invalid_config_before_installing() {
        let config = LoggerConfig {
            console: ConsoleConfig::new(false, false),
            file: FileConfig::default(),
            level: "info".to_string(),
        };
        assert!(matches!(
            init_logger(config),
            Err(LoggerError::Config { .. })
        ));
    }
}
