use super::utils::{ensure_unique, select_newest_first};
use async_trait::async_trait;
use services::common::{Page, RecordFilter, RepositoryError};
use services::usage::{UsageRecord, UsageRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only usage record store
#[derive(Default)]
pub struct InMemoryUsageRepository {
    records: RwLock<Vec<UsageRecord>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn insert(&self, record: UsageRecord) -> Result<UsageRecord, RepositoryError> {
        let mut records = self.records.write().await;
        ensure_unique(&records, &record.id, |r| &r.id)?;
        records.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UsageRecord>, RepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, usize), RepositoryError> {
        let snapshot = self.records.read().await.clone();
        Ok(select_newest_first(&snapshot, filter, page))
    }
}
