use crate::consts::{
    DEFAULT_CONTENT_ITEMS, DEFAULT_LIST_LIMIT, MAX_CONTENT_ITEMS, MAX_LABEL_LENGTH,
    MAX_LIST_LIMIT, MAX_TEXT_LENGTH,
};
use crate::routes::common::{validate_max_length, validate_optional_text, validate_text};
use serde::{Deserialize, Serialize};
use services::{
    analytics::{DailyUsageSummary, EngagementSummary, FeedbackSummary},
    common::{Page, RecordFilter},
    engagement::EngagementEvent,
    feedback::{
        FeedbackPatch, FeedbackReason, FeedbackRecord, FeedbackSignal, RecordFeedbackRequest,
        Touchpoint, MAX_COMMENT_CHARS,
    },
    learning::{
        AnalyzeWordsRequest, AnswerCheck, CheckAnswerRequest, DetailedAnswerCheck,
        GenerateContentRequest, GeneratedItem, LearningContext, LearningOutcome, TranslateRequest,
        Translation, TranslationWithAnalysis, WordAnalysis,
    },
    models::ModelInfo,
    usage::UsageRecord,
};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ============================================
// Errors
// ============================================

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String, error_type: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
                param: None,
            },
        }
    }

    pub fn with_param(message: String, error_type: String, param: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
                param: Some(param),
            },
        }
    }
}

// ============================================
// Learning API Models
// ============================================

/// Caller identity and learning context shared by every learning request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LearningContextBody {
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Use this model instead of the active one
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub learning_mode: Option<String>,
    #[serde(default)]
    pub learning_level: Option<String>,
    /// Client feature tag, e.g. "flashcards"
    #[serde(default)]
    pub functionality: Option<String>,
}

impl LearningContextBody {
    pub fn validate(&self) -> Result<(), String> {
        validate_text(&self.user_id, "user_id", MAX_LABEL_LENGTH)?;
        for (value, field) in [
            (self.session_id.as_deref(), "session_id"),
            (self.model_id.as_deref(), "model_id"),
            (self.learning_mode.as_deref(), "learning_mode"),
            (self.learning_level.as_deref(), "learning_level"),
            (self.functionality.as_deref(), "functionality"),
        ] {
            validate_optional_text(value, field, MAX_LABEL_LENGTH)?;
        }
        Ok(())
    }
}

impl From<LearningContextBody> for LearningContext {
    fn from(body: LearningContextBody) -> Self {
        Self {
            user_id: body.user_id,
            session_id: body.session_id,
            model_id: body.model_id,
            learning_mode: body.learning_mode,
            learning_level: body.learning_level,
            functionality: body.functionality,
        }
    }
}

fn default_content_items() -> u32 {
    DEFAULT_CONTENT_ITEMS
}

/// Request practice content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentBody {
    #[serde(flatten)]
    pub context: LearningContextBody,
    pub language: String,
    pub mode: String,
    pub level: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_content_items")]
    pub count: u32,
    /// Attach a word breakdown to every generated item
    #[serde(default)]
    pub with_word_analysis: bool,
}

impl GenerateContentBody {
    pub fn validate(&self) -> Result<(), String> {
        self.context.validate()?;
        validate_text(&self.language, "language", MAX_LABEL_LENGTH)?;
        validate_text(&self.mode, "mode", MAX_LABEL_LENGTH)?;
        validate_text(&self.level, "level", MAX_LABEL_LENGTH)?;
        validate_optional_text(self.topic.as_deref(), "topic", MAX_TEXT_LENGTH)?;
        if self.count == 0 || self.count > MAX_CONTENT_ITEMS {
            return Err(format!("count must be between 1 and {MAX_CONTENT_ITEMS}"));
        }
        Ok(())
    }

    pub fn into_parts(self) -> (LearningContext, GenerateContentRequest, bool) {
        (
            self.context.into(),
            GenerateContentRequest {
                language: self.language,
                mode: self.mode,
                level: self.level,
                topic: self.topic,
                count: self.count,
            },
            self.with_word_analysis,
        )
    }
}

/// Translate a piece of text
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslateBody {
    #[serde(flatten)]
    pub context: LearningContextBody,
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

impl TranslateBody {
    pub fn validate(&self) -> Result<(), String> {
        self.context.validate()?;
        validate_text(&self.text, "text", MAX_TEXT_LENGTH)?;
        validate_text(&self.source_language, "source_language", MAX_LABEL_LENGTH)?;
        validate_text(&self.target_language, "target_language", MAX_LABEL_LENGTH)
    }

    pub fn into_parts(self) -> (LearningContext, TranslateRequest) {
        (
            self.context.into(),
            TranslateRequest {
                text: self.text,
                source_language: self.source_language,
                target_language: self.target_language,
            },
        )
    }
}

/// Grade a learner answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckAnswerBody {
    #[serde(flatten)]
    pub context: LearningContextBody,
    pub prompt: String,
    #[serde(default)]
    pub expected: Option<String>,
    pub answer: String,
    pub language: String,
}

impl CheckAnswerBody {
    pub fn validate(&self) -> Result<(), String> {
        self.context.validate()?;
        validate_text(&self.prompt, "prompt", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.expected.as_deref(), "expected", MAX_TEXT_LENGTH)?;
        // An empty answer is still an attempt
        validate_max_length(&self.answer, "answer", MAX_TEXT_LENGTH)?;
        validate_text(&self.language, "language", MAX_LABEL_LENGTH)
    }

    pub fn into_parts(self) -> (LearningContext, CheckAnswerRequest) {
        (
            self.context.into(),
            CheckAnswerRequest {
                prompt: self.prompt,
                expected: self.expected,
                answer: self.answer,
                language: self.language,
            },
        )
    }
}

/// Break a text down into words worth learning
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeWordsBody {
    #[serde(flatten)]
    pub context: LearningContextBody,
    pub text: String,
    pub language: String,
}

impl AnalyzeWordsBody {
    pub fn validate(&self) -> Result<(), String> {
        self.context.validate()?;
        validate_text(&self.text, "text", MAX_TEXT_LENGTH)?;
        validate_text(&self.language, "language", MAX_LABEL_LENGTH)
    }

    pub fn into_parts(self) -> (LearningContext, AnalyzeWordsRequest) {
        (
            self.context.into(),
            AnalyzeWordsRequest {
                text: self.text,
                language: self.language,
            },
        )
    }
}

/// Response wrapper for a learning call: the result plus the usage record
/// clients reference when they submit feedback
macro_rules! learning_response {
    ($(#[$meta:meta])* $name:ident, $result:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, ToSchema)]
        pub struct $name {
            pub result: $result,
            pub usage_record_id: Uuid,
            pub model_id: String,
            pub xp_awarded: i64,
        }

        impl From<LearningOutcome<$result>> for $name {
            fn from(outcome: LearningOutcome<$result>) -> Self {
                Self {
                    result: outcome.result,
                    usage_record_id: outcome.usage_record_id,
                    model_id: outcome.model_id,
                    xp_awarded: outcome.xp_awarded,
                }
            }
        }
    };
}

learning_response!(
    /// Generated practice items
    ContentResponse,
    Vec<GeneratedItem>
);
learning_response!(TranslationResponse, Translation);
learning_response!(TranslationWithAnalysisResponse, TranslationWithAnalysis);
learning_response!(AnswerCheckResponse, AnswerCheck);
learning_response!(DetailedAnswerCheckResponse, DetailedAnswerCheck);
learning_response!(WordAnalysisResponse, Vec<WordAnalysis>);

// ============================================
// Feedback API Models
// ============================================

/// Submit feedback on a learning call
///
/// Passing `feedback_id` of an existing record updates that record instead
/// of creating a new one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub feedback_id: Option<Uuid>,
    pub usage_record_id: Uuid,
    /// Defaults to the user of the usage record
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub touchpoint: Touchpoint,
    pub signal: FeedbackSignal,
    #[serde(default)]
    pub reason: Option<FeedbackReason>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub xp_delta: Option<i64>,
}

impl CreateFeedbackRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_optional_text(self.user_id.as_deref(), "user_id", MAX_LABEL_LENGTH)?;
        validate_optional_text(self.session_id.as_deref(), "session_id", MAX_LABEL_LENGTH)?;
        validate_optional_text(self.comment.as_deref(), "comment", MAX_COMMENT_CHARS)
    }
}

impl From<CreateFeedbackRequest> for RecordFeedbackRequest {
    fn from(request: CreateFeedbackRequest) -> Self {
        Self {
            feedback_id: request.feedback_id,
            usage_record_id: request.usage_record_id,
            user_id: request.user_id,
            session_id: request.session_id,
            touchpoint: request.touchpoint,
            signal: request.signal,
            reason: request.reason,
            comment: request.comment,
            xp_delta: request.xp_delta,
        }
    }
}

/// Partial feedback update; omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateFeedbackRequest {
    #[serde(default)]
    pub signal: Option<FeedbackSignal>,
    #[serde(default)]
    pub reason: Option<FeedbackReason>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub xp_delta: Option<i64>,
    #[serde(default)]
    pub touchpoint: Option<Touchpoint>,
}

impl UpdateFeedbackRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_optional_text(self.comment.as_deref(), "comment", MAX_COMMENT_CHARS)
    }
}

impl From<UpdateFeedbackRequest> for FeedbackPatch {
    fn from(request: UpdateFeedbackRequest) -> Self {
        Self {
            signal: request.signal,
            reason: request.reason,
            comment: request.comment,
            xp_delta: request.xp_delta,
            touchpoint: request.touchpoint,
        }
    }
}

// ============================================
// Engagement API Models
// ============================================

/// Track a user action
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEngagementRequest {
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Defaults to the provider of `model_id`, or of the active model
    #[serde(default)]
    pub provider: Option<String>,
    /// Defaults to the active model
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub language_id: Option<String>,
    pub operation: String,
    pub feature: String,
    pub action: String,
    #[serde(default)]
    pub xp_delta: Option<i64>,
    #[serde(default)]
    pub functionality: Option<String>,
    #[serde(default)]
    pub learning_mode: Option<String>,
    #[serde(default)]
    pub learning_level: Option<String>,
}

impl CreateEngagementRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_text(&self.user_id, "user_id", MAX_LABEL_LENGTH)?;
        validate_text(&self.operation, "operation", MAX_LABEL_LENGTH)?;
        validate_text(&self.feature, "feature", MAX_LABEL_LENGTH)?;
        validate_text(&self.action, "action", MAX_LABEL_LENGTH)?;
        for (value, field) in [
            (self.session_id.as_deref(), "session_id"),
            (self.provider.as_deref(), "provider"),
            (self.model_id.as_deref(), "model_id"),
            (self.language_id.as_deref(), "language_id"),
            (self.functionality.as_deref(), "functionality"),
            (self.learning_mode.as_deref(), "learning_mode"),
            (self.learning_level.as_deref(), "learning_level"),
        ] {
            validate_optional_text(value, field, MAX_LABEL_LENGTH)?;
        }
        Ok(())
    }
}

// ============================================
// Model API Models
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
    pub active_model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetActiveModelRequest {
    pub model_id: String,
}

// ============================================
// Admin query models
// ============================================

/// Filters shared by the admin list and summary endpoints.
/// `start` / `end` accept RFC 3339 timestamps or `YYYY-MM-DD` dates and are
/// inclusive; malformed bounds are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordQuery {
    pub user_id: Option<String>,
    pub language_id: Option<String>,
    pub model_id: Option<String>,
    pub feature: Option<String>,
    pub operation: Option<String>,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    /// Feedback only
    pub signal: Option<String>,
    /// Feedback only
    pub touchpoint: Option<String>,
    /// Engagement only
    pub action: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RecordQuery {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_LIST_LIMIT {
                return Err(format!("limit must be between 1 and {MAX_LIST_LIMIT}"));
            }
        }
        Ok(())
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            user_id: self.user_id.clone(),
            language_id: self.language_id.clone(),
            model_id: self.model_id.clone(),
            feature: self.feature.clone(),
            operation: self.operation.clone(),
            functionality: self.functionality.clone(),
            learning_mode: self.learning_mode.clone(),
            learning_level: self.learning_level.clone(),
            signal: self.signal.clone(),
            touchpoint: self.touchpoint.clone(),
            action: self.action.clone(),
            start: None,
            end: None,
        }
        .with_bounds(self.start.as_deref(), self.end.as_deref())
    }

    /// Page for list endpoints
    pub fn page(&self) -> Page {
        Page::new(
            Some(self.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
            self.offset.unwrap_or(0),
        )
    }
}

macro_rules! list_response {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, ToSchema)]
        pub struct $name {
            pub data: Vec<$item>,
            /// Matching rows before paging
            pub total: usize,
            pub limit: usize,
            pub offset: usize,
        }
    };
}

list_response!(
    /// Usage records, newest first
    UsageListResponse,
    UsageRecord
);
list_response!(
    /// Feedback records, newest first
    FeedbackListResponse,
    FeedbackRecord
);
list_response!(
    /// Engagement events, newest first
    EngagementListResponse,
    EngagementEvent
);

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyUsageSummaryResponse {
    pub data: Vec<DailyUsageSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackSummaryResponse {
    pub data: Vec<FeedbackSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EngagementSummaryResponse {
    pub data: Vec<EngagementSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_json() -> serde_json::Value {
        json!({ "user_id": "u1", "learning_mode": "sentences" })
    }

    #[test]
    fn test_generate_content_defaults_and_flattened_context() {
        let mut body = context_json();
        body["language"] = json!("es");
        body["mode"] = json!("sentences");
        body["level"] = json!("A1");

        let request: GenerateContentBody = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.count, DEFAULT_CONTENT_ITEMS);
        assert!(!request.with_word_analysis);

        let (context, service_request, with_words) = request.into_parts();
        assert_eq!(context.user_id, "u1");
        assert_eq!(context.learning_mode.as_deref(), Some("sentences"));
        assert_eq!(service_request.language, "es");
        assert!(!with_words);
    }

    #[test]
    fn test_generate_content_count_bounds() {
        let mut body = context_json();
        body["language"] = json!("es");
        body["mode"] = json!("sentences");
        body["level"] = json!("A1");
        body["count"] = json!(MAX_CONTENT_ITEMS + 1);

        let request: GenerateContentBody = serde_json::from_value(body).unwrap();
        assert!(request.validate().unwrap_err().starts_with("count"));
    }

    #[test]
    fn test_context_requires_user() {
        let body = json!({
            "user_id": " ",
            "text": "hola",
            "source_language": "es",
            "target_language": "en"
        });
        let request: TranslateBody = serde_json::from_value(body).unwrap();
        assert_eq!(request.validate().unwrap_err(), "user_id is required");
    }

    #[test]
    fn test_feedback_comment_limit() {
        let request = UpdateFeedbackRequest {
            comment: Some("x".repeat(MAX_COMMENT_CHARS + 1)),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateFeedbackRequest {
            comment: Some("x".repeat(MAX_COMMENT_CHARS)),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_record_query() {
        let query = RecordQuery {
            user_id: Some("u1".to_string()),
            start: Some("2024-07-01".to_string()),
            end: Some("not a date".to_string()),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.user_id.as_deref(), Some("u1"));
        assert!(filter.start.is_some());
        assert!(filter.end.is_none());
        assert_eq!(query.page(), Page::new(Some(DEFAULT_LIST_LIMIT), 0));

        let query = RecordQuery {
            limit: Some(MAX_LIST_LIMIT + 1),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
