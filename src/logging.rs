//! Logging bootstrap: an append-only log file plus a console layer

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use crate::error::{VaultError, VaultResult};

pub const LOG_FILE_NAME: &str = "datavault.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the log file (created if missing). `None` logs to
    /// the console only and never touches disk.
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
    /// Console shows DEBUG instead of INFO
    pub debug_to_console: bool,
}

impl LogConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: Some(log_dir.into()),
            file_name: LOG_FILE_NAME.to_string(),
            debug_to_console: false,
        }
    }

    /// Console layer only
    pub fn console_only() -> Self {
        Self {
            log_dir: None,
            file_name: LOG_FILE_NAME.to_string(),
            debug_to_console: false,
        }
    }

    pub fn debug_to_console(mut self, debug: bool) -> Self {
        self.debug_to_console = debug;
        self
    }
}

/// Install the global subscriber.
///
/// The file layer records DEBUG and up; the console (stderr) records INFO and
/// up, or DEBUG with `debug_to_console`. `RUST_LOG` narrows both. Keep the
/// returned guard alive until exit so buffered lines reach the file. There is
/// no guard without a log directory.
pub fn init_logging(config: &LogConfig) -> VaultResult<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::never(log_dir, &config.file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let console_level = if config.debug_to_console {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr)
                .with_filter(console_level),
        )
        .try_init()
        .map_err(|e| VaultError::Logging(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("nested").join("logs");
        assert!(!log_dir.exists());

        // The global subscriber can only be installed once per process, so
        // a second installation attempt may fail; the directory is created either way.
        let result = init_logging(&LogConfig::new(&log_dir));
        assert!(log_dir.exists());

        match result {
            Ok(guard) => drop(guard),
            Err(e) => assert!(e.to_string().contains("logging"), "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::new("data").debug_to_console(true);
        assert_eq!(config.file_name, LOG_FILE_NAME);
        assert_eq!(config.log_dir, Some(PathBuf::from("data")));
        assert!(config.debug_to_console);
    }

    #[test]
    fn test_console_only_has_no_log_dir() {
        assert!(LogConfig::console_only().log_dir.is_none());
    }
}
