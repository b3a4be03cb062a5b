use crate::models::*;
use crate::routes::health::HealthResponse;
use services::{
    analytics::{DailyUsageSummary, EngagementSummary, FeedbackSummary},
    engagement::EngagementEvent,
    feedback::{FeedbackContext, FeedbackReason, FeedbackRecord, FeedbackSignal, Touchpoint},
    learning::{
        AnswerCheck, DetailedAnswerCheck, GeneratedItem, Translation, TranslationWithAnalysis,
        WordAnalysis,
    },
    models::ModelInfo,
    progress::{Achievement, UserProgress},
    usage::{UsageMetadata, UsageRecord},
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Language Learning API",
        description = "AI-assisted language practice with usage, cost, feedback and engagement analytics.\n\n## Authentication\n\nLearner endpoints are open. Admin endpoints require `Authorization: Bearer <ADMIN_TOKEN>`.",
        version = "1.0.0",
        license(
            name = "MIT",
        )
    ),
    paths(
        crate::routes::health::health_check,
        // Learning endpoints
        crate::routes::learning::generate_content,
        crate::routes::learning::translate_text,
        crate::routes::learning::translate_with_analysis,
        crate::routes::learning::check_answer,
        crate::routes::learning::check_answer_detailed,
        crate::routes::learning::analyze_words,
        // Feedback and engagement
        crate::routes::feedback::create_feedback,
        crate::routes::feedback::update_feedback,
        crate::routes::engagement::create_engagement_event,
        crate::routes::engagement::get_progress,
        // Models
        crate::routes::models::list_models,
        crate::routes::models::set_active_model,
        // Admin analytics
        crate::routes::admin::list_usage,
        crate::routes::admin::get_usage_record,
        crate::routes::admin::usage_summary,
        crate::routes::admin::list_feedback,
        crate::routes::admin::feedback_summary,
        crate::routes::admin::list_engagement,
        crate::routes::admin::engagement_summary,
    ),
    components(
        schemas(
            ErrorResponse, ErrorDetail, HealthResponse,
            // Learning
            LearningContextBody, GenerateContentBody, TranslateBody, CheckAnswerBody,
            AnalyzeWordsBody, ContentResponse, TranslationResponse,
            TranslationWithAnalysisResponse, AnswerCheckResponse, DetailedAnswerCheckResponse,
            WordAnalysisResponse, GeneratedItem, Translation, TranslationWithAnalysis,
            WordAnalysis, AnswerCheck, DetailedAnswerCheck,
            // Feedback
            CreateFeedbackRequest, UpdateFeedbackRequest, FeedbackRecord, FeedbackContext,
            FeedbackSignal, FeedbackReason, Touchpoint,
            // Engagement and progress
            CreateEngagementRequest, EngagementEvent, UserProgress, Achievement,
            // Models
            ModelsResponse, ModelInfo, SetActiveModelRequest,
            // Admin
            UsageRecord, UsageMetadata, UsageListResponse, FeedbackListResponse,
            EngagementListResponse, DailyUsageSummary, FeedbackSummary, EngagementSummary,
            DailyUsageSummaryResponse, FeedbackSummaryResponse, EngagementSummaryResponse,
        ),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for OpenAPI
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Admin bearer token
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
