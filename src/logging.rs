//! Structured logging
//!
//! The terminal belongs to the TUI, so log output always goes to a file.
//! `CODEATLAS_LOG` takes an `EnvFilter` directive and wins over the config.

use crate::config::{Config, LogSettings};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "CODEATLAS_LOG";

/// Log file with precedence: CLI, config file, platform default.
pub fn resolve_log_file_path(cli_file: Option<PathBuf>, settings: &LogSettings) -> Result<PathBuf> {
    if let Some(p) = cli_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    if let Some(p) = settings.file.clone().filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    Config::default_log_path().context("Could not determine platform data directory for log file")
}

/// Filter from `CODEATLAS_LOG`, else `default_level`, else `info`.
pub fn build_env_filter(env_value: Option<&str>, default_level: &str) -> EnvFilter {
    if let Some(directive) = env_value.filter(|v| !v.trim().is_empty()) {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("  Warning: ignoring invalid {} ({})", LOG_ENV, err),
        }
    }
    EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file in use.
pub fn init_logging(settings: &LogSettings, cli_file: Option<PathBuf>) -> Result<PathBuf> {
    let log_file = resolve_log_file_path(cli_file, settings)?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_env_filter(env_value.as_deref(), &settings.level);

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Logging was already initialized")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        file = %log_file.display(),
        "logging started"
    );
    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_path_wins() {
        let settings = LogSettings {
            level: "info".to_string(),
            file: Some(PathBuf::from("/tmp/from-config.log")),
        };
        let path = resolve_log_file_path(Some(PathBuf::from("/tmp/cli.log")), &settings).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cli.log"));

        let path = resolve_log_file_path(Some(PathBuf::new()), &settings).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/from-config.log"));
    }

    #[test]
    fn test_env_filter_precedence() {
        assert_eq!(build_env_filter(Some("debug"), "warn").to_string(), "debug");
        assert_eq!(build_env_filter(None, "warn").to_string(), "warn");
        assert_eq!(build_env_filter(Some("  "), "warn").to_string(), "warn");
        assert_eq!(build_env_filter(None, "codeatlas=loud").to_string(), "info");
    }
}
