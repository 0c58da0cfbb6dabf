//! Configuration module
//!
//! Handles loading configuration and applying environment overrides.

mod env;

pub use env::EnvConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How each work unit is invoked
    pub runner: RunnerConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Build the effective configuration: file (if any), then environment
    pub fn resolve(env: &EnvConfig) -> Result<Self> {
        let mut config = match &env.config_file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(program) = &env.program {
            config.runner.program = program.clone();
        }
        if let Some(level) = &env.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.runner.program.trim().is_empty() {
            anyhow::bail!("Runner program must not be empty");
        }
        Ok(())
    }
}

/// External program invoked once per work unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable to spawn
    pub program: String,

    /// Arguments placed before the work unit
    pub args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "php".to_string(),
            args: vec!["artisan".to_string()],
        }
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
