use crate::{
    middleware::AdminUser,
    models::{ErrorResponse, ModelsResponse, SetActiveModelRequest},
    routes::common::{bad_request, map_models_error, ApiError},
    AppState,
};
use axum::{extract::State, response::Json as ResponseJson, Extension};
use services::models::ModelInfo;
use tracing::{debug, info};

/// List models
///
/// Every registered model, flagged with whether it is the one used when a
/// request does not name a model.
#[utoipa::path(
    get,
    path = "/v1/models",
    tag = "Models",
    responses(
        (status = 200, description = "Registered models", body = ModelsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_models(
    State(app_state): State<AppState>,
) -> Result<ResponseJson<ModelsResponse>, ApiError> {
    debug!("List models request");

    let data = app_state
        .models_service
        .list_models()
        .await
        .map_err(map_models_error)?;
    let active_model_id = app_state
        .models_service
        .get_active_model_id()
        .await
        .map_err(map_models_error)?;

    Ok(ResponseJson(ModelsResponse {
        data,
        active_model_id,
    }))
}

/// Select the active model (Admin only)
///
/// Takes effect for every later request that does not name a model. An
/// unregistered id is rejected and the selection is left unchanged.
#[utoipa::path(
    put,
    path = "/v1/admin/models/active",
    tag = "Admin",
    request_body = SetActiveModelRequest,
    responses(
        (status = 200, description = "Newly active model", body = ModelInfo),
        (status = 400, description = "Model not registered", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn set_active_model(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    ResponseJson(request): ResponseJson<SetActiveModelRequest>,
) -> Result<ResponseJson<ModelInfo>, ApiError> {
    let model_id = request.model_id.trim();
    if model_id.is_empty() {
        return Err(bad_request("model_id is required"));
    }

    let model = app_state
        .models_service
        .set_active_model(model_id)
        .await
        .map_err(map_models_error)?;

    info!(model_id = %model.id, "Active model changed via admin API");
    Ok(ResponseJson(model))
}
