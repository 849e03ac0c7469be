//! Cache directory path
//!
//! Uses platform directories via the `dirs` crate:
//! - Linux: `~/.cache/mini-redux-notes/`
//! - macOS: `~/Library/Caches/mini-redux-notes/`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "mini-redux-notes";

/// Get the application cache directory, creating it if needed
///
/// Release builds write their log files here.
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
