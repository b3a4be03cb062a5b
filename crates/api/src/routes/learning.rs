use crate::{
    models::{
        AnalyzeWordsBody, AnswerCheckResponse, CheckAnswerBody, ContentResponse,
        DetailedAnswerCheckResponse, ErrorResponse, GenerateContentBody, TranslateBody,
        TranslationResponse, TranslationWithAnalysisResponse, WordAnalysisResponse,
    },
    routes::common::{bad_request, map_learning_error, ApiError},
    AppState,
};
use axum::{extract::State, response::Json as ResponseJson};
use tracing::debug;

/// Generate practice content
///
/// Produces practice sentences for the requested language, mode and level.
/// With `with_word_analysis` every item also carries a word breakdown; an
/// item whose breakdown fails is returned without one.
#[utoipa::path(
    post,
    path = "/v1/learning/content",
    tag = "Learning",
    request_body = GenerateContentBody,
    responses(
        (status = 200, description = "Generated items", body = ContentResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn generate_content(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<GenerateContentBody>,
) -> Result<ResponseJson<ContentResponse>, ApiError> {
    debug!(
        user_id = %body.context.user_id,
        language = %body.language,
        count = body.count,
        "Generate content request"
    );
    body.validate().map_err(bad_request)?;

    let (context, request, with_word_analysis) = body.into_parts();
    let outcome = app_state
        .learning_service
        .generate_content(context, request, with_word_analysis)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}

/// Translate text
#[utoipa::path(
    post,
    path = "/v1/learning/translate",
    tag = "Learning",
    request_body = TranslateBody,
    responses(
        (status = 200, description = "Translation", body = TranslationResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn translate_text(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<TranslateBody>,
) -> Result<ResponseJson<TranslationResponse>, ApiError> {
    debug!(user_id = %body.context.user_id, "Translate request");
    body.validate().map_err(bad_request)?;

    let (context, request) = body.into_parts();
    let outcome = app_state
        .learning_service
        .translate_text(context, request)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}

/// Translate text with a word-by-word breakdown
#[utoipa::path(
    post,
    path = "/v1/learning/translate/analysis",
    tag = "Learning",
    request_body = TranslateBody,
    responses(
        (status = 200, description = "Translation with word analysis", body = TranslationWithAnalysisResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn translate_with_analysis(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<TranslateBody>,
) -> Result<ResponseJson<TranslationWithAnalysisResponse>, ApiError> {
    debug!(user_id = %body.context.user_id, "Translate with analysis request");
    body.validate().map_err(bad_request)?;

    let (context, request) = body.into_parts();
    let outcome = app_state
        .learning_service
        .translate_with_analysis(context, request)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}

/// Check a learner answer
///
/// Awards XP to the learner: more for a correct answer than for an attempt.
#[utoipa::path(
    post,
    path = "/v1/learning/check-answer",
    tag = "Learning",
    request_body = CheckAnswerBody,
    responses(
        (status = 200, description = "Verdict", body = AnswerCheckResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn check_answer(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<CheckAnswerBody>,
) -> Result<ResponseJson<AnswerCheckResponse>, ApiError> {
    debug!(user_id = %body.context.user_id, "Check answer request");
    body.validate().map_err(bad_request)?;

    let (context, request) = body.into_parts();
    let outcome = app_state
        .learning_service
        .check_answer(context, request)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}

/// Check a learner answer with a score and corrections
#[utoipa::path(
    post,
    path = "/v1/learning/check-answer/detailed",
    tag = "Learning",
    request_body = CheckAnswerBody,
    responses(
        (status = 200, description = "Scored verdict", body = DetailedAnswerCheckResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn check_answer_detailed(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<CheckAnswerBody>,
) -> Result<ResponseJson<DetailedAnswerCheckResponse>, ApiError> {
    debug!(user_id = %body.context.user_id, "Detailed check answer request");
    body.validate().map_err(bad_request)?;

    let (context, request) = body.into_parts();
    let outcome = app_state
        .learning_service
        .check_answer_detailed(context, request)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}

/// Analyze the words of a text for vocabulary study
#[utoipa::path(
    post,
    path = "/v1/learning/analyze-words",
    tag = "Learning",
    request_body = AnalyzeWordsBody,
    responses(
        (status = 200, description = "Word analysis", body = WordAnalysisResponse),
        (status = 400, description = "Invalid request or unknown model", body = ErrorResponse),
        (status = 500, description = "AI provider failure", body = ErrorResponse)
    )
)]
pub async fn analyze_words(
    State(app_state): State<AppState>,
    ResponseJson(body): ResponseJson<AnalyzeWordsBody>,
) -> Result<ResponseJson<WordAnalysisResponse>, ApiError> {
    debug!(user_id = %body.context.user_id, "Analyze words request");
    body.validate().map_err(bad_request)?;

    let (context, request) = body.into_parts();
    let outcome = app_state
        .learning_service
        .analyze_words(context, request)
        .await
        .map_err(map_learning_error)?;

    Ok(ResponseJson(outcome.into()))
}
