use crate::common::{Dimension, FilterableRecord, Page, RecordFilter, RepositoryError};
use crate::progress::ProgressError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A discrete user action. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EngagementEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub session_id: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub language_id: Option<String>,
    pub operation: String,
    pub feature: String,
    pub action: String,
    pub xp_delta: Option<i64>,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
}

impl FilterableRecord for EngagementEvent {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
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
            Dimension::Action => Some(&self.action),
            Dimension::Signal | Dimension::Touchpoint => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordEngagementRequest {
    pub user_id: String,
    pub session_id: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub language_id: Option<String>,
    pub operation: String,
    pub feature: String,
    pub action: String,
    pub xp_delta: Option<i64>,
    pub functionality: Option<String>,
    pub learning_mode: Option<String>,
    pub learning_level: Option<String>,
}

#[async_trait::async_trait]
pub trait EngagementServiceTrait: Send + Sync {
    /// Store the event and award its XP delta, if any, to the user
    async fn record_event(
        &self,
        request: RecordEngagementRequest,
    ) -> Result<EngagementEvent, EngagementError>;

    async fn list_events(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<EngagementEvent>, usize), EngagementError>;
}

#[async_trait::async_trait]
pub trait EngagementRepository: Send + Sync {
    async fn insert(&self, event: EngagementEvent) -> Result<EngagementEvent, RepositoryError>;

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<EngagementEvent>, usize), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Failed to update progress: {0}")]
    Progress(#[from] ProgressError),
}
