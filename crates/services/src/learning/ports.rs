use crate::models::ModelsError;
use crate::usage::{AdapterUsage, UsageError};
use inference_providers::CompletionError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

/// XP for a correct answer
pub const XP_CORRECT_ANSWER: i64 = 10;
/// XP for an attempt that was not correct
pub const XP_ATTEMPT: i64 = 2;

/// The AI-backed operations a model adapter offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LearningOperation {
    GenerateContent,
    TranslateText,
    TranslateWithAnalysis,
    CheckAnswer,
    CheckAnswerDetailed,
    AnalyzeWords,
}

impl LearningOperation {
    pub const ALL: [LearningOperation; 6] = [
        LearningOperation::GenerateContent,
        LearningOperation::TranslateText,
        LearningOperation::TranslateWithAnalysis,
        LearningOperation::CheckAnswer,
        LearningOperation::CheckAnswerDetailed,
        LearningOperation::AnalyzeWords,
    ];

    /// Operation name stored on usage records and engagement events
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningOperation::GenerateContent => "generate_content",
            LearningOperation::TranslateText => "translate_text",
            LearningOperation::TranslateWithAnalysis => "translate_with_analysis",
            LearningOperation::CheckAnswer => "check_answer",
            LearningOperation::CheckAnswerDetailed => "check_answer_detailed",
            LearningOperation::AnalyzeWords => "analyze_words_for_learning",
        }
    }

    /// Product feature the operation belongs to
    pub fn feature(&self) -> &'static str {
        match self {
            LearningOperation::GenerateContent
            | LearningOperation::CheckAnswer
            | LearningOperation::CheckAnswerDetailed => "practice",
            LearningOperation::TranslateText | LearningOperation::TranslateWithAnalysis => {
                "translator"
            }
            LearningOperation::AnalyzeWords => "vocabulary",
        }
    }

    /// Marker line placed in every prompt for this operation
    pub fn task_marker(&self) -> String {
        format!("TASK[{}]", self.as_str())
    }
}

// ============================================
// Adapter request / result types
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentRequest {
    /// Language being learned
    pub language: String,
    /// Practice mode, e.g. "sentences" or "vocabulary"
    pub mode: String,
    pub level: String,
    pub topic: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentItem {
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Translation {
    #[serde(alias = "translation")]
    pub translated_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WordAnalysis {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationWithAnalysis {
    #[serde(alias = "translation")]
    pub translated_text: String,
    #[serde(default)]
    pub words: Vec<WordAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckAnswerRequest {
    /// The exercise shown to the learner
    pub prompt: String,
    pub expected: Option<String>,
    pub answer: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerCheck {
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetailedAnswerCheck {
    pub is_correct: bool,
    /// 0 to 100
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub corrections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeWordsRequest {
    pub text: String,
    pub language: String,
}

/// Adapter result plus whatever token usage the provider reported
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterResponse<T> {
    pub result: T,
    pub usage: Option<AdapterUsage>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("AI provider call failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("AI provider returned unusable output: {0}")]
    InvalidOutput(String),
}

/// One model's implementation of the learning operations
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait::async_trait]
pub trait LearningAdapter: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<AdapterResponse<Vec<ContentItem>>, AdapterError>;

    async fn translate_text(
        &self,
        request: &TranslateRequest,
    ) -> Result<AdapterResponse<Translation>, AdapterError>;

    async fn translate_with_analysis(
        &self,
        request: &TranslateRequest,
    ) -> Result<AdapterResponse<TranslationWithAnalysis>, AdapterError>;

    async fn check_answer(
        &self,
        request: &CheckAnswerRequest,
    ) -> Result<AdapterResponse<AnswerCheck>, AdapterError>;

    async fn check_answer_detailed(
        &self,
        request: &CheckAnswerRequest,
    ) -> Result<AdapterResponse<DetailedAnswerCheck>, AdapterError>;

    async fn analyze_words_for_learning(
        &self,
        request: &AnalyzeWordsRequest,
    ) -> Result<AdapterResponse<Vec<WordAnalysis>>, AdapterError>;
}

// ============================================
// Service types
// ============================================

/// Who is asking and in which learning context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningContext {
    pub user_id: String,
    pub session_id: Option<String>,
    /// Overrides the active model for this call
    pub model_id: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    pub functionality: Option<String>,
}

/// A generated practice item, optionally with its word breakdown
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeneratedItem {
    pub text: String,
    pub translation: Option<String>,
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordAnalysis>>,
}

impl From<ContentItem> for GeneratedItem {
    fn from(item: ContentItem) -> Self {
        Self {
            text: item.text,
            translation: item.translation,
            hint: item.hint,
            words: None,
        }
    }
}

/// Result of a learning call with the usage record it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningOutcome<T> {
    pub result: T,
    pub usage_record_id: Uuid,
    pub model_id: String,
    pub xp_awarded: i64,
}

#[async_trait::async_trait]
pub trait LearningServiceTrait: Send + Sync {
    async fn generate_content(
        &self,
        context: LearningContext,
        request: GenerateContentRequest,
        with_word_analysis: bool,
    ) -> Result<LearningOutcome<Vec<GeneratedItem>>, LearningError>;

    async fn translate_text(
        &self,
        context: LearningContext,
        request: TranslateRequest,
    ) -> Result<LearningOutcome<Translation>, LearningError>;

    async fn translate_with_analysis(
        &self,
        context: LearningContext,
        request: TranslateRequest,
    ) -> Result<LearningOutcome<TranslationWithAnalysis>, LearningError>;

    async fn check_answer(
        &self,
        context: LearningContext,
        request: CheckAnswerRequest,
    ) -> Result<LearningOutcome<AnswerCheck>, LearningError>;

    async fn check_answer_detailed(
        &self,
        context: LearningContext,
        request: CheckAnswerRequest,
    ) -> Result<LearningOutcome<DetailedAnswerCheck>, LearningError>;

    async fn analyze_words(
        &self,
        context: LearningContext,
        request: AnalyzeWordsRequest,
    ) -> Result<LearningOutcome<Vec<WordAnalysis>>, LearningError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error(transparent)]
    Model(#[from] ModelsError),
    #[error(transparent)]
    Upstream(#[from] AdapterError),
    #[error("Failed to record usage: {0}")]
    Usage(#[from] UsageError),
}
