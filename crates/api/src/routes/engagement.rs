use crate::{
    models::{CreateEngagementRequest, ErrorResponse},
    routes::common::{
        bad_request, map_engagement_error, map_models_error, map_progress_error, ApiError,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use services::{
    engagement::{EngagementEvent, RecordEngagementRequest},
    progress::UserProgress,
};
use tracing::debug;

/// Track a user action
///
/// Events that carry `xp_delta` also update the user's progress. Missing
/// `provider` / `model_id` are taken from the requested or active model.
#[utoipa::path(
    post,
    path = "/v1/engagement",
    tag = "Engagement",
    request_body = CreateEngagementRequest,
    responses(
        (status = 201, description = "Stored event", body = EngagementEvent),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_engagement_event(
    State(app_state): State<AppState>,
    ResponseJson(request): ResponseJson<CreateEngagementRequest>,
) -> Result<(StatusCode, ResponseJson<EngagementEvent>), ApiError> {
    debug!(
        user_id = %request.user_id,
        action = %request.action,
        "Engagement event request"
    );
    request.validate().map_err(bad_request)?;

    let (provider, model_id) = match (request.provider, request.model_id) {
        (Some(provider), Some(model_id)) => (provider, model_id),
        (provider, model_id) => {
            let resolved = app_state
                .models_service
                .resolve_adapter(model_id.as_deref())
                .await
                .map_err(map_models_error)?;
            (
                provider.unwrap_or(resolved.descriptor.provider),
                resolved.descriptor.id,
            )
        }
    };

    let event = app_state
        .engagement_service
        .record_event(RecordEngagementRequest {
            user_id: request.user_id,
            session_id: request.session_id,
            provider,
            model_id,
            language_id: request.language_id,
            operation: request.operation,
            feature: request.feature,
            action: request.action,
            xp_delta: request.xp_delta,
            functionality: request.functionality,
            learning_mode: request.learning_mode,
            learning_level: request.learning_level,
        })
        .await
        .map_err(map_engagement_error)?;

    Ok((StatusCode::CREATED, ResponseJson(event)))
}

/// Get a user's XP, level, streak and achievements
///
/// Unknown users get a fresh level-1 record.
#[utoipa::path(
    get,
    path = "/v1/progress/{user_id}",
    tag = "Engagement",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User progress", body = UserProgress),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_progress(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ResponseJson<UserProgress>, ApiError> {
    debug!(user_id = %user_id, "Get progress request");

    let progress = app_state
        .progress_service
        .get_progress(&user_id)
        .await
        .map_err(map_progress_error)?;

    Ok(ResponseJson(progress))
}
