pub mod ports;

pub use ports::*;

use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct ProgressServiceImpl {
    repository: Arc<dyn ProgressRepository>,
}

impl ProgressServiceImpl {
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl ProgressServiceTrait for ProgressServiceImpl {
    async fn get_progress(&self, user_id: &str) -> Result<UserProgress, ProgressError> {
        Ok(self
            .repository
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserProgress::new(user_id)))
    }

    async fn award_xp(
        &self,
        user_id: &str,
        xp_delta: i64,
        at: DateTime<Utc>,
    ) -> Result<UserProgress, ProgressError> {
        let progress = self
            .repository
            .apply_award(user_id, XpAward { xp_delta, at })
            .await?;

        tracing::debug!(
            user_id,
            xp_delta,
            xp = progress.xp,
            streak = progress.current_streak,
            "Awarded XP"
        );
        Ok(progress)
    }
}
