pub mod repositories;

use std::sync::Arc;

pub use repositories::{
    InMemoryEngagementRepository, InMemoryFeedbackRepository, InMemoryProgressRepository,
    InMemorySettingsRepository, InMemoryUsageRepository,
};

/// Storage handles shared by every service
///
/// Each repository is an independent store behind its own lock. The whole
/// database lives for the lifetime of the process.
#[derive(Clone, Default)]
pub struct Database {
    pub usage: Arc<InMemoryUsageRepository>,
    pub feedback: Arc<InMemoryFeedbackRepository>,
    pub engagement: Arc<InMemoryEngagementRepository>,
    pub progress: Arc<InMemoryProgressRepository>,
    pub settings: Arc<InMemorySettingsRepository>,
}

impl Database {
    /// Create an empty in-process database
    pub fn in_memory() -> Self {
        tracing::info!("Initializing in-memory storage");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::models::AiSettingsRepository;

    #[tokio::test]
    async fn test_clones_share_state() {
        let db = Database::in_memory();
        let other = db.clone();

        other
            .settings
            .set_active_model_id("gemini-2.0-flash")
            .await
            .unwrap();

        assert_eq!(
            db.settings.get_active_model_id().await.unwrap().as_deref(),
            Some("gemini-2.0-flash")
        );
    }
}
