use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json as ResponseJson};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the AI settings store cannot be read
    pub status: String,
    /// Model used when a request does not name one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_model_id: Option<String>,
    /// Number of models in the registry
    pub registered_models: usize,
    /// Service version (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Health check endpoint
///
/// Requires no authentication. Reads the active model from the settings
/// store, so a broken store shows up here as 503.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "AI settings store unavailable", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(app_state): State<AppState>,
) -> (StatusCode, ResponseJson<HealthResponse>) {
    let registered_models = app_state
        .models_service
        .list_models()
        .await
        .map(|models| models.len())
        .unwrap_or_default();

    let (status, active_model_id) = match app_state.models_service.get_active_model_id().await {
        Ok(model_id) => (StatusCode::OK, Some(model_id)),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the active model");
            (StatusCode::SERVICE_UNAVAILABLE, None)
        }
    };

    (
        status,
        ResponseJson(HealthResponse {
            status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
            active_model_id,
            registered_models,
            version: option_env!("CARGO_PKG_VERSION").map(|v| v.to_string()),
        }),
    )
}
