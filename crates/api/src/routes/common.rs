use crate::models::ErrorResponse;
use axum::{http::StatusCode, response::Json as ResponseJson};
use services::{
    analytics::AnalyticsError,
    engagement::EngagementError,
    feedback::FeedbackError,
    learning::{AdapterError, LearningError},
    models::ModelsError,
    progress::ProgressError,
    usage::UsageError,
};

/// Error half of every handler result
pub type ApiError = (StatusCode, ResponseJson<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>, error_type: &str) -> ApiError {
    (
        status,
        ResponseJson(ErrorResponse::new(message.into(), error_type.to_string())),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message, "invalid_request")
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::NOT_FOUND, message, "not_found")
}

pub fn internal_error(message: impl Into<String>) -> ApiError {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        "internal_server_error",
    )
}

/// Validate that a required string field is not blank
pub fn validate_non_empty_field(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// Validate the character length of a string field
pub fn validate_max_length(value: &str, field: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

/// Required and bounded
pub fn validate_text(value: &str, field: &str, max: usize) -> Result<(), String> {
    validate_non_empty_field(value, field)?;
    validate_max_length(value, field, max)
}

pub fn validate_optional_text(value: Option<&str>, field: &str, max: usize) -> Result<(), String> {
    match value {
        Some(value) => validate_max_length(value, field, max),
        None => Ok(()),
    }
}

// ============================================
// Service error mapping
// ============================================

pub fn map_models_error(error: ModelsError) -> ApiError {
    match error {
        ModelsError::NotRegistered(_) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string(), "invalid_model")
        }
        ModelsError::Repository(e) => {
            tracing::error!(error = %e, "Failed to read AI settings");
            internal_error("Failed to read AI settings")
        }
    }
}

pub fn map_learning_error(error: LearningError) -> ApiError {
    match error {
        LearningError::Model(e) => map_models_error(e),
        LearningError::Upstream(e) => {
            tracing::error!(error = %e, "AI provider call failed");
            let message = match e {
                AdapterError::InvalidOutput(_) => "The AI provider returned an unreadable reply",
                AdapterError::Completion(_) => "The AI provider request failed",
            };
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message, "upstream_error")
        }
        LearningError::Usage(e) => {
            tracing::error!(error = %e, "Failed to record usage");
            internal_error("Failed to record usage")
        }
    }
}

pub fn map_feedback_error(error: FeedbackError) -> ApiError {
    match error {
        FeedbackError::UsageRecordNotFound(_) | FeedbackError::NotFound(_) => {
            not_found(error.to_string())
        }
        FeedbackError::Validation(message) => bad_request(message),
        FeedbackError::Repository(e) => {
            tracing::error!(error = %e, "Feedback store failure");
            internal_error("Failed to store feedback")
        }
    }
}

pub fn map_engagement_error(error: EngagementError) -> ApiError {
    tracing::error!(error = %error, "Engagement store failure");
    internal_error("Failed to record engagement")
}

pub fn map_progress_error(error: ProgressError) -> ApiError {
    tracing::error!(error = %error, "Progress store failure");
    internal_error("Failed to read progress")
}

pub fn map_usage_error(error: UsageError) -> ApiError {
    match error {
        UsageError::NotFound(_) => not_found(error.to_string()),
        other => {
            tracing::error!(error = %other, "Usage store failure");
            internal_error("Failed to read usage")
        }
    }
}

pub fn map_analytics_error(error: AnalyticsError) -> ApiError {
    tracing::error!(error = %error, "Aggregation failed");
    internal_error("Failed to compute summary")
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::common::RepositoryError;
    use uuid::Uuid;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("hola", "text", 10).is_ok());
        assert_eq!(
            validate_text("   ", "text", 10).unwrap_err(),
            "text is required"
        );
        assert_eq!(
            validate_text("ñññññ", "text", 4).unwrap_err(),
            "text must be at most 4 characters"
        );
        assert!(validate_optional_text(None, "topic", 1).is_ok());
    }

    #[test]
    fn test_error_status_mapping() {
        let (status, body) = map_models_error(ModelsError::NotRegistered("gpt".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.error.r#type, "invalid_model");

        let (status, _) = map_feedback_error(FeedbackError::UsageRecordNotFound(Uuid::nil()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = map_feedback_error(FeedbackError::Validation("too long".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = map_learning_error(LearningError::Upstream(
            AdapterError::InvalidOutput("no json".to_string()),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.error.r#type, "upstream_error");

        let (status, _) = map_analytics_error(AnalyticsError::Repository(
            RepositoryError::StorageError("down".to_string()),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
