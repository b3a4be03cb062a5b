pub mod ports;

pub use ports::*;

use crate::common::{Page, RecordFilter};
use crate::progress::ProgressServiceTrait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct EngagementServiceImpl {
    repository: Arc<dyn EngagementRepository>,
    progress_service: Arc<dyn ProgressServiceTrait>,
}

impl EngagementServiceImpl {
    pub fn new(
        repository: Arc<dyn EngagementRepository>,
        progress_service: Arc<dyn ProgressServiceTrait>,
    ) -> Self {
        Self {
            repository,
            progress_service,
        }
    }
}

#[async_trait::async_trait]
impl EngagementServiceTrait for EngagementServiceImpl {
    async fn record_event(
        &self,
        request: RecordEngagementRequest,
    ) -> Result<EngagementEvent, EngagementError> {
        let event = EngagementEvent {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: request.user_id,
            session_id: request.session_id,
            provider: request.provider,
            model_id: request.model_id,
            language_id: request.language_id,
            operation: request.operation,
            feature: request.feature,
            action: request.action,
            xp_delta: request.xp_delta,
            functionality: request.functionality,
            learning_mode: request.learning_mode,
            learning_level: request.learning_level,
        };

        let event = self.repository.insert(event).await?;
        tracing::debug!(
            event_id = %event.id,
            user_id = %event.user_id,
            action = %event.action,
            "Recorded engagement event"
        );

        if let Some(xp_delta) = event.xp_delta {
            self.progress_service
                .award_xp(&event.user_id, xp_delta, event.timestamp)
                .await?;
        }

        Ok(event)
    }

    async fn list_events(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<EngagementEvent>, usize), EngagementError> {
        Ok(self.repository.list(filter, page).await?)
    }
}
