pub mod aggregation;

pub use aggregation::{
    active_seconds, daily_usage_summary, engagement_summary, feedback_summary, DailyUsageSummary,
    EngagementSummary, FeedbackSummary, IDLE_CUTOFF_SECS,
};

use crate::common::{Page, RecordFilter, RepositoryError};
use crate::engagement::EngagementRepository;
use crate::feedback::FeedbackRepository;
use crate::usage::UsageRepository;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Dashboard summaries derived on demand from the record stores
#[async_trait]
pub trait AnalyticsServiceTrait: Send + Sync {
    async fn daily_usage_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<DailyUsageSummary>, AnalyticsError>;

    async fn feedback_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackSummary>, AnalyticsError>;

    async fn engagement_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<EngagementSummary>, AnalyticsError>;
}

pub struct AnalyticsServiceImpl {
    usage_repository: Arc<dyn UsageRepository>,
    feedback_repository: Arc<dyn FeedbackRepository>,
    engagement_repository: Arc<dyn EngagementRepository>,
}

impl AnalyticsServiceImpl {
    pub fn new(
        usage_repository: Arc<dyn UsageRepository>,
        feedback_repository: Arc<dyn FeedbackRepository>,
        engagement_repository: Arc<dyn EngagementRepository>,
    ) -> Self {
        Self {
            usage_repository,
            feedback_repository,
            engagement_repository,
        }
    }
}

#[async_trait]
impl AnalyticsServiceTrait for AnalyticsServiceImpl {
    async fn daily_usage_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<DailyUsageSummary>, AnalyticsError> {
        let (records, _) = self.usage_repository.list(filter, Page::all()).await?;
        Ok(daily_usage_summary(&records, limit))
    }

    async fn feedback_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackSummary>, AnalyticsError> {
        let (records, _) = self.feedback_repository.list(filter, Page::all()).await?;
        Ok(feedback_summary(&records, limit))
    }

    async fn engagement_summary(
        &self,
        filter: &RecordFilter,
        limit: Option<usize>,
    ) -> Result<Vec<EngagementSummary>, AnalyticsError> {
        let (events, _) = self.engagement_repository.list(filter, Page::all()).await?;
        Ok(engagement_summary(&events, limit))
    }
}
