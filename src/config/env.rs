//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "ARTISAN_FANOUT";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Config file from ARTISAN_FANOUT_CONFIG
    pub config_file: Option<String>,
    /// Runner program from ARTISAN_FANOUT_PROGRAM
    pub program: Option<String>,
    /// Log level from ARTISAN_FANOUT_LOG
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            config_file: get_env("CONFIG"),
            program: get_env("PROGRAM"),
            log_level: get_env("LOG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.config_file.is_some() || self.program.is_some() || self.log_level.is_some()
    }
}

/// Get a non-empty environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}
