//! File-based logging using simplelog
//!
//! Log file location depends on build type:
//! - Debug builds: current working directory (for development convenience)
//! - Release builds: cache directory (~/.cache/mini-redux-notes/ on Linux)
//!
//! The terminal belongs to the REPL, so nothing is logged to it.

use anyhow::Context;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

/// Get the log file path based on build type
fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("notes-{}.log", timestamp);

    if cfg!(debug_assertions) {
        PathBuf::from(filename)
    } else {
        notes_config::cache_dir()
            .map(|dir| dir.join(&filename))
            .unwrap_or_else(|_| PathBuf::from(filename))
    }
}

/// RUST_LOG wins over the configured level
fn level_from_env(configured: LevelFilter) -> LevelFilter {
    match std::env::var("RUST_LOG") {
        Ok(value) => value.parse().unwrap_or(LevelFilter::Info),
        Err(_) => configured,
    }
}

/// Initialize file-based logging
///
/// Returns the path of the log file.
pub fn init(configured: LevelFilter) -> anyhow::Result<PathBuf> {
    let log_file = log_file_path();
    let level = level_from_env(configured);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = File::create(&log_file).with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}
