use api::{build_app, init_domain_services};
use config::{ApiConfig, LoggingConfig};
use database::Database;

#[tokio::main]
async fn main() {
    // A local .env file is optional
    let _ = dotenvy::dotenv();

    // YAML config when present, environment variables otherwise
    let config = match ApiConfig::load() {
        Ok(config) => config,
        Err(config::ConfigError::FileNotFound { .. }) => ApiConfig::from_env().unwrap_or_else(|e| {
            eprintln!("Invalid environment configuration: {e}");
            std::process::exit(1);
        }),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    let database = Database::in_memory();
    let app_state = init_domain_services(&database, &config);
    let app = build_app(app_state, &config);

    if config.admin.token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, admin endpoints will reject every request");
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %bind_address, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!("API Endpoints:");
    tracing::info!("  - POST /v1/learning/{{content,translate,translate/analysis}}");
    tracing::info!("  - POST /v1/learning/{{check-answer,check-answer/detailed,analyze-words}}");
    tracing::info!("  - POST /v1/feedback, PATCH /v1/feedback/{{id}}");
    tracing::info!("  - POST /v1/engagement, GET /v1/progress/{{user_id}}");
    tracing::info!("  - GET /v1/models");
    tracing::info!("  - Admin: /v1/admin/{{usage,feedback,engagement}}[/summary], PUT /v1/admin/models/active");
    tracing::info!("  - GET /api-docs/openapi.json");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn init_tracing(logging_config: &LoggingConfig) {
    let filter = logging_config.filter_directive();

    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
