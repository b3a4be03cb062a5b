use async_trait::async_trait;
use services::common::RepositoryError;
use services::progress::{ProgressRepository, UserProgress, XpAward};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-user gamification state keyed by user id
#[derive(Default)]
pub struct InMemoryProgressRepository {
    progress: RwLock<HashMap<String, UserProgress>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }
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
        let unlocked = award.apply(entry);
        if !unlocked.is_empty() {
            tracing::info!(
                user_id,
                achievements = ?unlocked.iter().map(|a| a.as_str()).collect::<Vec<_>>(),
                "Achievements unlocked"
            );
        }
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_awards_accumulate() {
        let repo = InMemoryProgressRepository::new();
        assert!(repo.get("u1").await.unwrap().is_none());

        let now = Utc::now();
        repo.apply_award("u1", XpAward { xp_delta: 60, at: now })
            .await
            .unwrap();
        let progress = repo
            .apply_award("u1", XpAward { xp_delta: 60, at: now })
            .await
            .unwrap();

        assert_eq!(progress.xp, 120);
        assert_eq!(progress.level, 2);
        assert_eq!(repo.get("u1").await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn test_concurrent_awards_are_not_lost() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.apply_award("u1", XpAward { xp_delta: 5, at: now })
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.get("u1").await.unwrap().unwrap().xp, 100);
    }
}
