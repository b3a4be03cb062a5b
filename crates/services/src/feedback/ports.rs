use crate::common::{Dimension, FilterableRecord, Page, RecordFilter, RepositoryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSignal {
    Positive,
    Negative,
    Neutral,
}

impl FeedbackSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSignal::Positive => "positive",
            FeedbackSignal::Negative => "negative",
            FeedbackSignal::Neutral => "neutral",
        }
    }
}

/// Why a response was rated negatively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackReason {
    Accuracy,
    Tone,
    Latency,
    Complexity,
    Other,
}

/// Where in the product the feedback was given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Touchpoint {
    Translation,
    ContentGeneration,
    CheckAnswer,
    WordAnalysis,
    Other,
}

impl Touchpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Touchpoint::Translation => "translation",
            Touchpoint::ContentGeneration => "content-generation",
            Touchpoint::CheckAnswer => "check-answer",
            Touchpoint::WordAnalysis => "word-analysis",
            Touchpoint::Other => "other",
        }
    }
}

/// Snapshot of the rated call, copied from its usage record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackContext {
    pub source_text: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub translated_text: Option<String>,
}

impl FeedbackContext {
    pub fn is_empty(&self) -> bool {
        self.source_text.is_none()
            && self.source_language.is_none()
            && self.target_language.is_none()
            && self.translated_text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub usage_record_id: Uuid,
    pub user_id: String,
    pub session_id: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub language_id: Option<String>,
    pub operation: String,
    pub feature: String,
    pub touchpoint: Touchpoint,
    pub signal: FeedbackSignal,
    pub reason: Option<FeedbackReason>,
    pub comment: Option<String>,
    pub xp_delta: Option<i64>,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
    pub context: Option<FeedbackContext>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterableRecord for FeedbackRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Language => self.language_id.as_deref(),
            Dimension::Model => Some(&self.model_id),
            Dimension::Feature => Some(&self.feature),
            Dimension::Operation => Some(&self.operation),
            Dimension::Functionality => self.functionality.as_deref(),
            Dimension::LearningMode => self.learning_mode.as_deref(),
            Dimension::LearningLevel => self.learning_level.as_deref(),
            Dimension::Signal => Some(self.signal.as_str()),
            Dimension::Touchpoint => Some(self.touchpoint.as_str()),
            Dimension::Action => None,
        }
    }
}

/// Create feedback for a usage record, or update it when `feedback_id` names
/// an existing record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFeedbackRequest {
    pub feedback_id: Option<Uuid>,
    pub usage_record_id: Uuid,
    /// Defaults to the user of the usage record
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub touchpoint: Touchpoint,
    pub signal: FeedbackSignal,
    pub reason: Option<FeedbackReason>,
    pub comment: Option<String>,
    pub xp_delta: Option<i64>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackPatch {
    pub signal: Option<FeedbackSignal>,
    pub reason: Option<FeedbackReason>,
    pub comment: Option<String>,
    pub xp_delta: Option<i64>,
    pub touchpoint: Option<Touchpoint>,
}

impl FeedbackPatch {
    pub fn apply(self, record: &mut FeedbackRecord, at: DateTime<Utc>) {
        if let Some(signal) = self.signal {
            record.signal = signal;
        }
        if self.reason.is_some() {
            record.reason = self.reason;
        }
        if self.comment.is_some() {
            record.comment = self.comment;
        }
        if self.xp_delta.is_some() {
            record.xp_delta = self.xp_delta;
        }
        if let Some(touchpoint) = self.touchpoint {
            record.touchpoint = touchpoint;
        }
        if record.signal != FeedbackSignal::Negative {
            record.reason = None;
        }
        record.updated_at = at;
    }
}

#[async_trait::async_trait]
pub trait FeedbackServiceTrait: Send + Sync {
    async fn record_feedback(
        &self,
        request: RecordFeedbackRequest,
    ) -> Result<FeedbackRecord, FeedbackError>;

    async fn update_feedback(
        &self,
        id: Uuid,
        patch: FeedbackPatch,
    ) -> Result<FeedbackRecord, FeedbackError>;

    async fn list_feedback(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<FeedbackRecord>, usize), FeedbackError>;
}

#[async_trait::async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<FeedbackRecord>, RepositoryError>;

    /// Apply `patch` in place. `None` when no record has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: FeedbackPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<FeedbackRecord>, RepositoryError>;

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<FeedbackRecord>, usize), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Usage record not found: {0}")]
    UsageRecordNotFound(Uuid),
    #[error("Feedback not found: {0}")]
    NotFound(Uuid),
    #[error("Invalid feedback: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
