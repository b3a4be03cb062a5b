// Configuration Management
//
// This crate handles configuration loading for the language-learning API.
// Values come either from environment variables (`ApiConfig::from_env`) or
// from a YAML file (`ApiConfig::load`). Sections that are missing from a YAML
// file fall back to their defaults.

use std::path::Path;
use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found. Tried paths: {paths}")]
    FileNotFound { paths: String },

    #[error("Failed to read configuration file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration loading interface
impl ApiConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.default_model_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ai.default_model_id must not be empty".to_string(),
            ));
        }
        if self.ai.timeout_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "ai.timeout_seconds must be positive".to_string(),
            ));
        }
        if let Some(model) = self.ai.models.iter().find(|m| m.id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "model entry '{}' has an empty id",
                model.display_name
            )));
        }
        Ok(())
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = ["config/config.yaml", "config.yaml", "config/default.yaml"];

        for path in &config_paths {
            if std::path::Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }

        Err(ConfigError::FileNotFound {
            paths: config_paths.join(", "),
        })
    }
}
