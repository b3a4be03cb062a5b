pub mod consts;
pub mod demo;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;

use crate::{
    middleware::{admin_middleware, AuthState},
    openapi::ApiDoc,
    routes::{
        admin, engagement, feedback, health::health_check, learning, models as model_routes,
    },
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use config::{AiConfig, ApiConfig, ModelEntryConfig};
use database::Database;
use inference_providers::{BackendConfig, ExternalProvider, InferenceProvider};
use services::{
    analytics::AnalyticsServiceTrait,
    engagement::EngagementServiceTrait,
    feedback::FeedbackServiceTrait,
    learning::{LearningServiceTrait, ProviderLearningAdapter},
    models::{ModelDescriptor, ModelsService},
    progress::ProgressServiceTrait,
    usage::UsageServiceTrait,
    AnalyticsServiceImpl, EngagementServiceImpl, FeedbackServiceImpl, LearningServiceImpl,
    ModelRegistry, ProgressServiceImpl, UsageServiceImpl,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// Services shared by every route handler
#[derive(Clone)]
pub struct AppState {
    pub learning_service: Arc<dyn LearningServiceTrait>,
    pub usage_service: Arc<dyn UsageServiceTrait>,
    pub feedback_service: Arc<dyn FeedbackServiceTrait>,
    pub engagement_service: Arc<dyn EngagementServiceTrait>,
    pub progress_service: Arc<dyn ProgressServiceTrait>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait>,
    pub models_service: Arc<dyn ModelsService>,
}

/// Pick the generative-AI provider: Gemini when an API key is configured,
/// the offline demo provider otherwise
pub fn init_inference_provider(ai_config: &AiConfig) -> Arc<dyn InferenceProvider> {
    match &ai_config.api_key {
        Some(api_key) => {
            tracing::info!(base_url = %ai_config.base_url, "Using Gemini provider");
            Arc::new(ExternalProvider::gemini(BackendConfig {
                base_url: ai_config.base_url.clone(),
                api_key: api_key.clone(),
                timeout_seconds: ai_config.timeout_seconds,
                ..Default::default()
            }))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, serving canned replies from the demo provider");
            Arc::new(demo::demo_provider())
        }
    }
}

/// Build a model registry with one provider-backed adapter per configured model
pub fn init_model_registry(
    ai_config: &AiConfig,
    provider: Arc<dyn InferenceProvider>,
    database: &Database,
) -> ModelRegistry {
    let mut registry = ModelRegistry::new(
        ai_config.default_model_id.clone(),
        database.settings.clone(),
    );

    let mut entries = ai_config.models.clone();
    if !entries.iter().any(|m| m.id == ai_config.default_model_id) {
        tracing::warn!(
            model_id = %ai_config.default_model_id,
            "Default model missing from the model list, registering it"
        );
        entries.push(ModelEntryConfig::from_id(&ai_config.default_model_id));
    }

    for entry in entries {
        tracing::info!(
            model_id = %entry.id,
            provider = provider.provider_name(),
            "Registering model"
        );
        let adapter = Arc::new(ProviderLearningAdapter::new(
            provider.clone(),
            entry.id.clone(),
        ));
        registry.register(
            ModelDescriptor {
                id: entry.id,
                display_name: entry.display_name,
                provider: provider.provider_name().to_string(),
                description: entry.description,
            },
            adapter,
        );
    }

    registry
}

/// Wire every domain service over the given storage and provider
pub fn init_domain_services_with_provider(
    database: &Database,
    config: &ApiConfig,
    provider: Arc<dyn InferenceProvider>,
) -> AppState {
    let models_service: Arc<dyn ModelsService> =
        Arc::new(init_model_registry(&config.ai, provider, database));

    let progress_service = Arc::new(ProgressServiceImpl::new(database.progress.clone()))
        as Arc<dyn ProgressServiceTrait>;
    let engagement_service = Arc::new(EngagementServiceImpl::new(
        database.engagement.clone(),
        progress_service.clone(),
    )) as Arc<dyn EngagementServiceTrait>;
    let usage_service = Arc::new(UsageServiceImpl::new(
        database.usage.clone(),
        engagement_service.clone(),
    )) as Arc<dyn UsageServiceTrait>;
    let feedback_service = Arc::new(FeedbackServiceImpl::new(
        database.feedback.clone(),
        database.usage.clone(),
    )) as Arc<dyn FeedbackServiceTrait>;
    let analytics_service = Arc::new(AnalyticsServiceImpl::new(
        database.usage.clone(),
        database.feedback.clone(),
        database.engagement.clone(),
    )) as Arc<dyn AnalyticsServiceTrait>;
    let learning_service = Arc::new(LearningServiceImpl::new(
        models_service.clone(),
        usage_service.clone(),
    )) as Arc<dyn LearningServiceTrait>;

    AppState {
        learning_service,
        usage_service,
        feedback_service,
        engagement_service,
        progress_service,
        analytics_service,
        models_service,
    }
}

/// Initialize domain services with the provider selected by configuration
pub fn init_domain_services(database: &Database, config: &ApiConfig) -> AppState {
    let provider = init_inference_provider(&config.ai);
    init_domain_services_with_provider(database, config, provider)
}

/// Build the complete application router
pub fn build_app(app_state: AppState, config: &ApiConfig) -> Router {
    let auth_state = AuthState::new(config.admin.clone());

    Router::new()
        .merge(build_health_routes(app_state.clone()))
        .nest(
            "/v1",
            Router::new()
                .merge(build_learning_routes(app_state.clone()))
                .merge(build_tracking_routes(app_state.clone()))
                .merge(build_admin_routes(app_state, &auth_state)),
        )
        .merge(build_openapi_routes())
        .layer(CorsLayer::permissive())
}

/// Unauthenticated liveness and model status
pub fn build_health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(app_state)
}

/// AI-backed learning operations plus the public model list
pub fn build_learning_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/learning/content", post(learning::generate_content))
        .route("/learning/translate", post(learning::translate_text))
        .route(
            "/learning/translate/analysis",
            post(learning::translate_with_analysis),
        )
        .route("/learning/check-answer", post(learning::check_answer))
        .route(
            "/learning/check-answer/detailed",
            post(learning::check_answer_detailed),
        )
        .route("/learning/analyze-words", post(learning::analyze_words))
        .route("/models", get(model_routes::list_models))
        .with_state(app_state)
}

/// Feedback, engagement tracking and progress
pub fn build_tracking_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/feedback", post(feedback::create_feedback))
        .route("/feedback/{feedback_id}", patch(feedback::update_feedback))
        .route("/engagement", post(engagement::create_engagement_event))
        .route("/progress/{user_id}", get(engagement::get_progress))
        .with_state(app_state)
}

/// Build admin routes (authenticated endpoints)
pub fn build_admin_routes(app_state: AppState, auth_state: &AuthState) -> Router {
    Router::new()
        .route("/admin/models/active", put(model_routes::set_active_model))
        .route("/admin/usage", get(admin::list_usage))
        .route("/admin/usage/summary", get(admin::usage_summary))
        .route("/admin/usage/{usage_record_id}", get(admin::get_usage_record))
        .route("/admin/feedback", get(admin::list_feedback))
        .route("/admin/feedback/summary", get(admin::feedback_summary))
        .route("/admin/engagement", get(admin::list_engagement))
        .route("/admin/engagement/summary", get(admin::engagement_summary))
        .with_state(app_state)
        .layer(from_fn_with_state(auth_state.clone(), admin_middleware))
}

/// Build OpenAPI documentation routes
pub fn build_openapi_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}
