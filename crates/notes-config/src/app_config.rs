//! Application configuration
//!
//! Loaded from `.mini-redux-notes.toml`; every field has a default.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// How long the mock server takes to answer a create request
    #[serde(default = "default_api_latency_ms")]
    pub api_latency_ms: u64,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Install the logging middleware in the store pipeline
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,
}

fn default_api_latency_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_actions() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_latency_ms: default_api_latency_ms(),
            log_level: default_log_level(),
            log_actions: default_log_actions(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse TOML content, filling missing fields with defaults
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn api_latency(&self) -> Duration {
        Duration::from_millis(self.api_latency_ms)
    }

    /// The configured level, or `Debug` if it does not name one
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level {:?}, using debug", self.log_level);
            log::LevelFilter::Debug
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_latency_ms, 1000);
        assert_eq!(config.api_latency(), Duration::from_secs(1));
        assert_eq!(config.log_level, "debug");
        assert!(config.log_actions);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            api_latency_ms = 250
            log_level = "trace"
            log_actions = false
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.api_latency(), Duration::from_millis(250));
        assert_eq!(config.log_level_filter(), log::LevelFilter::Trace);
        assert!(!config.log_actions);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config = AppConfig::parse("api_latency_ms = 0").unwrap();
        assert_eq!(config.api_latency_ms, 0);
        // Other fields should use defaults
        assert_eq!(config.log_level, "debug");
        assert!(config.log_actions);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(AppConfig::parse("api_latency_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_debug() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let config = AppConfig::parse("log_level = \"WARN\"").unwrap();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Warn);
    }
}
