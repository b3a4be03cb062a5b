use crate::common::{Dimension, FilterableRecord, Page, RecordFilter, RepositoryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================
// Domain Types
// ============================================

/// Token counts reported by an adapter for a single call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdapterUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Only set when the provider reports a total of its own
    pub total_tokens: Option<u64>,
}

impl AdapterUsage {
    /// Convert provider-reported counts, clamping negative values to zero
    pub fn from_token_usage(usage: &inference_providers::TokenUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens.max(0) as u64,
            output_tokens: usage.completion_tokens.max(0) as u64,
            total_tokens: Some(usage.total_tokens.max(0) as u64),
        }
    }
}

/// Normalized token counts stored on a usage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizedTokens {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

impl NormalizedTokens {
    /// Missing usage counts as zero; a missing total is input + output
    pub fn from_usage(usage: Option<&AdapterUsage>) -> Self {
        let Some(usage) = usage else {
            return Self::default();
        };
        let input = usage.input_tokens;
        let output = usage.output_tokens;
        Self {
            input,
            output,
            total: usage.total_tokens.unwrap_or(input + output),
        }
    }
}

/// Learning context attached to a usage record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functionality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    /// Anything else the caller wants to keep with the record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One billed AI call. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub session_id: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub operation: String,
    pub feature: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: String,
    pub metadata: UsageMetadata,
    pub duration_ms: Option<u64>,
}

impl FilterableRecord for UsageRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Language => self.metadata.language_id.as_deref(),
            Dimension::Model => Some(&self.model_id),
            Dimension::Feature => Some(&self.feature),
            Dimension::Operation => Some(&self.operation),
            Dimension::Functionality => self.metadata.functionality.as_deref(),
            Dimension::LearningMode => self.metadata.learning_mode.as_deref(),
            Dimension::LearningLevel => self.metadata.learning_level.as_deref(),
            Dimension::Signal | Dimension::Touchpoint | Dimension::Action => None,
        }
    }
}

/// Ask the recorder to also log an engagement event for the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EngagementDirective {
    pub action: String,
    pub xp_delta: Option<i64>,
}

/// Everything the recorder needs to persist one AI call
#[derive(Debug, Clone)]
pub struct RecordUsageRequest {
    pub user_id: String,
    pub session_id: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub operation: String,
    pub feature: String,
    /// `None` when the adapter reported no usage (or the call failed)
    pub usage: Option<AdapterUsage>,
    pub metadata: UsageMetadata,
    pub duration_ms: Option<u64>,
    pub engagement: Option<EngagementDirective>,
}

// ============================================
// Service Traits
// ============================================

#[async_trait::async_trait]
pub trait UsageServiceTrait: Send + Sync {
    /// Persist exactly one usage record, plus an engagement event when requested
    async fn record_usage(&self, request: RecordUsageRequest) -> Result<UsageRecord, UsageError>;

    async fn get_usage_record(&self, id: Uuid) -> Result<UsageRecord, UsageError>;

    /// Newest first. Returns (records, total matching before paging).
    async fn list_usage(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, usize), UsageError>;
}

// ============================================
// Repository Traits
// ============================================

#[async_trait::async_trait]
pub trait UsageRepository: Send + Sync {
    async fn insert(&self, record: UsageRecord) -> Result<UsageRecord, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<UsageRecord>, RepositoryError>;

    /// Matching records newest first, windowed by `page`, with the unpaged total
    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, usize), RepositoryError>;
}

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("Usage record not found: {0}")]
    NotFound(Uuid),
    #[error("Failed to record engagement: {0}")]
    Engagement(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
