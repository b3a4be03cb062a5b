use crate::{
    models::{CreateFeedbackRequest, ErrorResponse, UpdateFeedbackRequest},
    routes::common::{bad_request, map_feedback_error, ApiError},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::Json as ResponseJson,
};
use services::feedback::FeedbackRecord;
use tracing::debug;
use uuid::Uuid;

/// Submit feedback on a learning call
///
/// Context (model, language, source and translated text) is copied from the
/// referenced usage record. When `feedback_id` names an existing record that
/// record is updated in place.
#[utoipa::path(
    post,
    path = "/v1/feedback",
    tag = "Feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 200, description = "Stored feedback", body = FeedbackRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Usage record not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_feedback(
    State(app_state): State<AppState>,
    ResponseJson(request): ResponseJson<CreateFeedbackRequest>,
) -> Result<ResponseJson<FeedbackRecord>, ApiError> {
    debug!(
        usage_record_id = %request.usage_record_id,
        signal = request.signal.as_str(),
        "Create feedback request"
    );
    request.validate().map_err(bad_request)?;

    let record = app_state
        .feedback_service
        .record_feedback(request.into())
        .await
        .map_err(map_feedback_error)?;

    Ok(ResponseJson(record))
}

/// Update feedback
#[utoipa::path(
    patch,
    path = "/v1/feedback/{feedback_id}",
    tag = "Feedback",
    params(
        ("feedback_id" = String, Path, description = "Feedback ID")
    ),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Updated feedback", body = FeedbackRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Feedback not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_feedback(
    State(app_state): State<AppState>,
    Path(feedback_id): Path<String>,
    ResponseJson(request): ResponseJson<UpdateFeedbackRequest>,
) -> Result<ResponseJson<FeedbackRecord>, ApiError> {
    debug!(feedback_id = %feedback_id, "Update feedback request");

    let feedback_id =
        Uuid::parse_str(&feedback_id).map_err(|_| bad_request("Invalid feedback ID"))?;
    request.validate().map_err(bad_request)?;

    let record = app_state
        .feedback_service
        .update_feedback(feedback_id, request.into())
        .await
        .map_err(map_feedback_error)?;

    Ok(ResponseJson(record))
}
