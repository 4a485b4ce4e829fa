//! Tracing subscriber setup

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// The configured log file; used while the terminal view owns the screen
    File,
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Format for a validated config value
    #[must_use]
    pub fn from_config(format: &str) -> Self {
        if format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level; `verbose` raises
/// the configured level to `debug`.
pub fn init(config: &LoggingConfig, verbose: bool, target: LogTarget) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("skypane={level},warn")))
        .with_context(|| format!("Invalid log filter for level '{level}'"))?;

    let format = LogFormat::from_config(&config.format);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (target, format) {
        (LogTarget::Stderr, LogFormat::Json) => builder.json().with_writer(std::io::stderr).try_init(),
        (LogTarget::Stderr, LogFormat::Pretty) => {
            builder.pretty().with_writer(std::io::stderr).try_init()
        }
        (LogTarget::File, format) => {
            let file = open_log_file(Path::new(&config.file_path))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            match format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Pretty => builder.pretty().try_init(),
            }
        }
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_config() {
        assert_eq!(LogFormat::from_config("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_config("json"), LogFormat::Json);
        assert_eq!(
            LogFormat::from_config(&LoggingConfig::default().format),
            LogFormat::Pretty
        );
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("skypane.log");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }
}
