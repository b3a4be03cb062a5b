use crate::{
    middleware::AdminUser,
    models::{
        DailyUsageSummaryResponse, EngagementListResponse, EngagementSummaryResponse,
        ErrorResponse, FeedbackListResponse, FeedbackSummaryResponse, RecordQuery,
        UsageListResponse,
    },
    routes::common::{
        bad_request, map_analytics_error, map_engagement_error, map_feedback_error,
        map_usage_error, ApiError,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    Extension,
};
use services::usage::UsageRecord;
use tracing::debug;
use uuid::Uuid;

/// List usage records (Admin only)
#[utoipa::path(
    get,
    path = "/v1/admin/usage",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Usage records, newest first", body = UsageListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn list_usage(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<UsageListResponse>, ApiError> {
    debug!(?query, "Admin list usage request");
    query.validate().map_err(bad_request)?;

    let page = query.page();
    let (data, total) = app_state
        .usage_service
        .list_usage(&query.filter(), page)
        .await
        .map_err(map_usage_error)?;

    Ok(ResponseJson(UsageListResponse {
        data,
        total,
        limit: page.limit.unwrap_or(total),
        offset: page.offset,
    }))
}

/// Get one usage record (Admin only)
#[utoipa::path(
    get,
    path = "/v1/admin/usage/{usage_record_id}",
    tag = "Admin",
    params(
        ("usage_record_id" = String, Path, description = "Usage record ID")
    ),
    responses(
        (status = 200, description = "Usage record", body = UsageRecord),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn get_usage_record(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Path(usage_record_id): Path<String>,
) -> Result<ResponseJson<UsageRecord>, ApiError> {
    let id = Uuid::parse_str(&usage_record_id)
        .map_err(|_| bad_request("Invalid usage record ID"))?;

    let record = app_state
        .usage_service
        .get_usage_record(id)
        .await
        .map_err(map_usage_error)?;

    Ok(ResponseJson(record))
}

/// Daily usage summary (Admin only)
///
/// One row per (date, user, provider, model), newest date first. `limit`
/// truncates the result; `offset` is ignored.
#[utoipa::path(
    get,
    path = "/v1/admin/usage/summary",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Daily usage rows", body = DailyUsageSummaryResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn usage_summary(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<DailyUsageSummaryResponse>, ApiError> {
    debug!(?query, "Admin usage summary request");
    query.validate().map_err(bad_request)?;

    let data = app_state
        .analytics_service
        .daily_usage_summary(&query.filter(), query.limit)
        .await
        .map_err(map_analytics_error)?;

    Ok(ResponseJson(DailyUsageSummaryResponse { data }))
}

/// List feedback (Admin only)
#[utoipa::path(
    get,
    path = "/v1/admin/feedback",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Feedback records, newest first", body = FeedbackListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn list_feedback(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<FeedbackListResponse>, ApiError> {
    debug!(?query, "Admin list feedback request");
    query.validate().map_err(bad_request)?;

    let page = query.page();
    let (data, total) = app_state
        .feedback_service
        .list_feedback(&query.filter(), page)
        .await
        .map_err(map_feedback_error)?;

    Ok(ResponseJson(FeedbackListResponse {
        data,
        total,
        limit: page.limit.unwrap_or(total),
        offset: page.offset,
    }))
}

/// Feedback summary (Admin only)
///
/// Signal counts per (date, user, language, model, feature, functionality,
/// learning mode, learning level), newest date first, then busiest bucket.
#[utoipa::path(
    get,
    path = "/v1/admin/feedback/summary",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Feedback buckets", body = FeedbackSummaryResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn feedback_summary(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<FeedbackSummaryResponse>, ApiError> {
    debug!(?query, "Admin feedback summary request");
    query.validate().map_err(bad_request)?;

    let data = app_state
        .analytics_service
        .feedback_summary(&query.filter(), query.limit)
        .await
        .map_err(map_analytics_error)?;

    Ok(ResponseJson(FeedbackSummaryResponse { data }))
}

/// List engagement events (Admin only)
#[utoipa::path(
    get,
    path = "/v1/admin/engagement",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Engagement events, newest first", body = EngagementListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn list_engagement(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<EngagementListResponse>, ApiError> {
    debug!(?query, "Admin list engagement request");
    query.validate().map_err(bad_request)?;

    let page = query.page();
    let (data, total) = app_state
        .engagement_service
        .list_events(&query.filter(), page)
        .await
        .map_err(map_engagement_error)?;

    Ok(ResponseJson(EngagementListResponse {
        data,
        total,
        limit: page.limit.unwrap_or(total),
        offset: page.offset,
    }))
}

/// Engagement summary (Admin only)
///
/// Per-bucket action counts, XP and active time. Gaps longer than 90 seconds
/// between consecutive events count as idle.
#[utoipa::path(
    get,
    path = "/v1/admin/engagement/summary",
    tag = "Admin",
    params(RecordQuery),
    responses(
        (status = 200, description = "Engagement buckets", body = EngagementSummaryResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn engagement_summary(
    State(app_state): State<AppState>,
    Extension(_admin): Extension<AdminUser>,
    Query(query): Query<RecordQuery>,
) -> Result<ResponseJson<EngagementSummaryResponse>, ApiError> {
    debug!(?query, "Admin engagement summary request");
    query.validate().map_err(bad_request)?;

    let data = app_state
        .analytics_service
        .engagement_summary(&query.filter(), query.limit)
        .await
        .map_err(map_analytics_error)?;

    Ok(ResponseJson(EngagementSummaryResponse { data }))
}
