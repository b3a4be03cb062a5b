// Test utilities for services crate
#![cfg(test)]

use crate::{
    common::{FilterableRecord, Page, RecordFilter, RepositoryError},
    engagement::{EngagementEvent, EngagementRepository},
    feedback::{FeedbackPatch, FeedbackRecord, FeedbackRepository},
    models::AiSettingsRepository,
    progress::{ProgressRepository, UserProgress, XpAward},
    usage::{UsageMetadata, UsageRecord, UsageRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

fn newest_first<R: FilterableRecord + Clone>(
    rows: &[R],
    filter: &RecordFilter,
    page: Page,
) -> (Vec<R>, usize) {
    let mut matching: Vec<R> = rows
        .iter()
        .rev()
        .filter(|r| filter.matches(*r))
        .cloned()
        .collect();
    matching.sort_by_key(|r| std::cmp::Reverse(r.timestamp()));
    page.apply(matching)
}

pub fn sample_usage_record(user_id: &str, model_id: &str) -> UsageRecord {
    UsageRecord {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        user_id: user_id.to_string(),
        session_id: Some("s1".to_string()),
        provider: "google".to_string(),
        model_id: model_id.to_string(),
        operation: "translate_text".to_string(),
        feature: "translator".to_string(),
        input_tokens: 0,
        output_tokens: 0,
        total_tokens: 0,
        input_cost: 0.0,
        output_cost: 0.0,
        total_cost: 0.0,
        currency: "USD".to_string(),
        metadata: UsageMetadata {
            language_id: Some("es".to_string()),
            ..Default::default()
        },
        duration_ms: None,
    }
}

#[derive(Default)]
pub struct InMemoryUsageRepository {
    records: RwLock<Vec<UsageRecord>>,
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn insert(&self, record: UsageRecord) -> Result<UsageRecord, RepositoryError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UsageRecord>, RepositoryError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, usize), RepositoryError> {
        Ok(newest_first(&self.records.read().await, filter, page))
    }
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    records: RwLock<Vec<FeedbackRecord>>,
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FeedbackRecord>, RepositoryError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: FeedbackPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<FeedbackRecord>, RepositoryError> {
        let mut records = self.records.write().await;
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            patch.apply(record, at);
            record.clone()
        }))
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<FeedbackRecord>, usize), RepositoryError> {
        Ok(newest_first(&self.records.read().await, filter, page))
    }
}

#[derive(Default)]
pub struct InMemoryEngagementRepository {
    events: RwLock<Vec<EngagementEvent>>,
}

#[async_trait]
impl EngagementRepository for InMemoryEngagementRepository {
    async fn insert(&self, event: EngagementEvent) -> Result<EngagementEvent, RepositoryError> {
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<EngagementEvent>, usize), RepositoryError> {
        Ok(newest_first(&self.events.read().await, filter, page))
    }
}

#[derive(Default)]
pub struct InMemoryProgressRepository {
    progress: RwLock<HashMap<String, UserProgress>>,
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserProgress>, RepositoryError> {
        Ok(self.progress.read().await.get(user_id).cloned())
    }

    async fn apply_award(
        &self,
        user_id: &str,
        award: XpAward,
    ) -> Result<UserProgress, RepositoryError> {
        let mut progress = self.progress.write().await;
        let entry = progress
            .entry(user_id.to_string())
            .or_insert_with(|| UserProgress::new(user_id));
        award.apply(entry);
        Ok(entry.clone())
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    active_model_id: RwLock<Option<String>>,
}

#[async_trait]
impl AiSettingsRepository for InMemorySettingsRepository {
    async fn get_active_model_id(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.active_model_id.read().await.clone())
    }

    async fn set_active_model_id(&self, model_id: &str) -> Result<(), RepositoryError> {
        *self.active_model_id.write().await = Some(model_id.to_string());
        Ok(())
    }
}
