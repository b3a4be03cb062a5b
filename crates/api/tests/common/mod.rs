#![allow(dead_code)]

pub mod endpoints;

pub use endpoints::*;

use api::{build_app, demo::demo_provider, init_domain_services_with_provider};
use config::{AdminConfig, AiConfig, ApiConfig, LoggingConfig, ModelEntryConfig, ServerConfig};
use database::Database;
use inference_providers::{MockProvider, TokenUsage, UsageMode};
use std::sync::Arc;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const FLASH_MODEL: &str = "gemini-2.5-flash";
pub const PRO_MODEL: &str = "gemini-2.5-pro";
pub const UNPRICED_MODEL: &str = "gemini-experimental";

/// Helper function to create a test configuration
pub fn test_config() -> ApiConfig {
    ApiConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
            modules: std::collections::HashMap::new(),
        },
        ai: AiConfig {
            default_model_id: FLASH_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 5,
            models: vec![
                ModelEntryConfig::from_id(FLASH_MODEL),
                ModelEntryConfig {
                    id: PRO_MODEL.to_string(),
                    display_name: "Gemini 2.5 Pro".to_string(),
                    description: Some("Slower, more thorough".to_string()),
                },
                ModelEntryConfig::from_id(UNPRICED_MODEL),
            ],
            ..Default::default()
        },
        admin: AdminConfig {
            token: Some(ADMIN_TOKEN.to_string()),
        },
    }
}

pub struct TestContext {
    pub server: axum_test::TestServer,
    /// The scripted provider behind every registered model
    pub provider: Arc<MockProvider>,
    pub database: Database,
}

/// Setup a complete test server over fresh in-memory storage.
/// Every AI call reports 1000 input and 500 output tokens.
pub fn setup_test_server() -> TestContext {
    setup_test_server_with_config(test_config())
}

pub fn setup_test_server_with_config(config: ApiConfig) -> TestContext {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
        .try_init();

    let provider =
        Arc::new(demo_provider().with_usage(UsageMode::Fixed(TokenUsage::new(1000, 500))));
    let database = Database::in_memory();
    let app_state = init_domain_services_with_provider(&database, &config, provider.clone());
    let app = build_app(app_state, &config);

    TestContext {
        server: axum_test::TestServer::new(app).unwrap(),
        provider,
        database,
    }
}

pub fn admin_auth() -> String {
    format!("Bearer {ADMIN_TOKEN}")
}
