//! Configuration and file locations for the notes app
//!
//! This crate provides:
//! - Configuration file loading (TOML) from the working or home directory
//! - Application configuration (AppConfig)
//! - Cache directory lookup

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, CONFIG_FILE};
pub use paths::cache_dir;
