use super::utils::{ensure_unique, select_newest_first};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use services::common::{Page, RecordFilter, RepositoryError};
use services::feedback::{FeedbackPatch, FeedbackRecord, FeedbackRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Feedback store; records are updated in place by id
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let mut records = self.records.write().await;
        ensure_unique(&records, &record.id, |r| &r.id)?;
        records.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FeedbackRecord>, RepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: FeedbackPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<FeedbackRecord>, RepositoryError> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(feedback_id = %id, "Feedback not found for update");
            return Ok(None);
        };
        patch.apply(record, at);
        Ok(Some(record.clone()))
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<FeedbackRecord>, usize), RepositoryError> {
        let snapshot = self.records.read().await.clone();
        Ok(select_newest_first(&snapshot, filter, page))
    }
}
