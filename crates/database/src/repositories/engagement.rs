use super::utils::{ensure_unique, select_newest_first};
use async_trait::async_trait;
use services::common::{Page, RecordFilter, RepositoryError};
use services::engagement::{EngagementEvent, EngagementRepository};
use tokio::sync::RwLock;

/// Append-only engagement event store
#[derive(Default)]
pub struct InMemoryEngagementRepository {
    events: RwLock<Vec<EngagementEvent>>,
}

impl InMemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngagementRepository for InMemoryEngagementRepository {
    async fn insert(&self, event: EngagementEvent) -> Result<EngagementEvent, RepositoryError> {
        let mut events = self.events.write().await;
        ensure_unique(&events, &event.id, |e| &e.id)?;
        events.push(event.clone());
        Ok(event)
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<EngagementEvent>, usize), RepositoryError> {
        let snapshot = self.events.read().await.clone();
        Ok(select_newest_first(&snapshot, filter, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(action: &str, day: u32) -> EngagementEvent {
        EngagementEvent {
            id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2024, 7, day, 9, 30, 0).unwrap(),
            user_id: "u1".to_string(),
            session_id: Some("s1".to_string()),
            provider: "google".to_string(),
            model_id: "gemini-2.5-flash".to_string(),
            language_id: Some("de".to_string()),
            operation: "generate_content".to_string(),
            feature: "practice".to_string(),
            action: action.to_string(),
            xp_delta: None,
            functionality: Some("flashcards".to_string()),
            learning_mode: None,
            learning_level: None,
        }
    }

    #[tokio::test]
    async fn test_inclusive_date_bounds() {
        let repo = InMemoryEngagementRepository::new();
        for day in [1, 2, 3] {
            repo.insert(event("generate_content", day)).await.unwrap();
        }

        let filter = RecordFilter::default().with_bounds(Some("2024-07-02"), Some("2024-07-03"));
        let (rows, total) = repo.list(&filter, Page::all()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].timestamp.format("%d").to_string(), "03");
    }

    #[tokio::test]
    async fn test_filter_by_action_and_functionality() {
        let repo = InMemoryEngagementRepository::new();
        repo.insert(event("generate_content", 1)).await.unwrap();
        repo.insert(event("check_answer", 1)).await.unwrap();

        let filter = RecordFilter {
            action: Some("check_answer".to_string()),
            functionality: Some("flashcards".to_string()),
            ..Default::default()
        };
        let (rows, _) = repo.list(&filter, Page::all()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, "check_answer");
    }
}
