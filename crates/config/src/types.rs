use serde::Deserialize;
use std::{collections::HashMap, env};

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub ai: AiConfig,
    pub admin: AdminConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
            ai: AiConfig::from_env()?,
            admin: AdminConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "SERVER_PORT must be a valid port number")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Logging Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub modules: HashMap<String, String>,
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut modules = HashMap::new();

        // Load module-specific log levels
        if let Ok(level) = env::var("LOG_MODULE_API") {
            modules.insert("api".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_SERVICES") {
            modules.insert("services".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_INFERENCE") {
            modules.insert("inference_providers".to_string(), level);
        }

        Ok(Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            modules,
        })
    }

    /// Build an `EnvFilter` directive string, e.g. `info,api=debug`
    pub fn filter_directive(&self) -> String {
        let mut filter = self.level.clone();
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            modules: HashMap::new(),
        }
    }
}

/// A model made available to learners at startup
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelEntryConfig {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelEntryConfig {
    pub fn from_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.to_string(),
            description: None,
        }
    }
}

/// Generative-AI provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Model used when no active selection exists or the selection is no longer registered
    pub default_model_id: String,
    /// Gemini API key; without one the server falls back to the mock provider
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: i64,
    pub models: Vec<ModelEntryConfig>,
}

impl AiConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let default_model_id =
            env::var("AI_DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());

        let mut models = env::var("AI_MODELS")
            .map(|list| parse_model_list(&list))
            .unwrap_or_default();
        if !models.iter().any(|m| m.id == default_model_id) {
            models.insert(0, ModelEntryConfig::from_id(&default_model_id));
        }

        Ok(Self {
            default_model_id,
            api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout_seconds: env::var("AI_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| "AI_TIMEOUT_SECONDS must be a valid number")?,
            models,
        })
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_model_id: DEFAULT_MODEL_ID.to_string(),
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_seconds: 60,
            models: vec![ModelEntryConfig::from_id(DEFAULT_MODEL_ID)],
        }
    }
}

/// Parse a comma-separated list of model ids, skipping blanks and duplicates
pub fn parse_model_list(list: &str) -> Vec<ModelEntryConfig> {
    let mut models: Vec<ModelEntryConfig> = Vec::new();
    for id in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !models.iter().any(|m| m.id == id) {
            models.push(ModelEntryConfig::from_id(id));
        }
    }
    models
}

/// Administrator access configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token accepted on admin routes; admin routes are closed when unset
    pub token: Option<String>,
}

impl AdminConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    pub fn is_valid_token(&self, candidate: &str) -> bool {
        match &self.token {
            Some(token) => token == candidate,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_list() {
        let models = parse_model_list(" gemini-2.5-flash, ,gemini-2.5-pro,gemini-2.5-flash ");
        assert_eq!(
            models,
            vec![
                ModelEntryConfig::from_id("gemini-2.5-flash"),
                ModelEntryConfig::from_id("gemini-2.5-pro"),
            ]
        );
        assert!(parse_model_list("").is_empty());
    }

    #[test]
    fn test_admin_token_validation() {
        let config = AdminConfig {
            token: Some("s3cret".to_string()),
        };
        assert!(config.is_valid_token("s3cret"));
        assert!(!config.is_valid_token("S3CRET"));
        assert!(!config.is_valid_token(""));

        // Closed when no token is configured
        let closed = AdminConfig::default();
        assert!(!closed.is_valid_token(""));
        assert!(!closed.is_valid_token("anything"));
    }

    #[test]
    fn test_logging_filter_directive() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.filter_directive(), "info");

        config
            .modules
            .insert("services".to_string(), "trace".to_string());
        config.modules.insert("api".to_string(), "debug".to_string());
        assert_eq!(config.filter_directive(), "info,api=debug,services=trace");
    }

    #[test]
    fn test_ai_defaults_register_default_model() {
        let config = AiConfig::default();
        assert_eq!(config.default_model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.models[0].id, DEFAULT_MODEL_ID);
        assert!(config.api_key.is_none());
    }
}
