//! Logging setup for hosts embedding the form controller
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=formfield::session=trace` - every edit and debounce schedule
//! - `RUST_LOG=formfield::host=debug` - commits and persistence
//!
//! # Log Files
//!
//! Logs are written to `~/.config/formfield/logs/formfield.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "formfield.log";

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). Call once at startup.
pub fn init() -> anyhow::Result<()> {
    let logs_dir = match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };
    init_with_logs_dir(logs_dir.as_deref())
}

/// Same as [`init`], with file logging to `logs_dir` when given
///
/// Fails if a global subscriber is already installed.
pub fn init_with_logs_dir(logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = logs_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new("debug"))
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Tracing subscriber already installed")
}
