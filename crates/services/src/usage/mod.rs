pub mod ports;
pub mod pricing;

pub use ports::*;
pub use pricing::{calculate_cost, pricing_for, pricing_table, CostBreakdown, PricingEntry};

use crate::common::{Page, RecordFilter};
use crate::engagement::{EngagementServiceTrait, RecordEngagementRequest};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct UsageServiceImpl {
    usage_repository: Arc<dyn UsageRepository>,
    engagement_service: Arc<dyn EngagementServiceTrait>,
}

impl UsageServiceImpl {
    pub fn new(
        usage_repository: Arc<dyn UsageRepository>,
        engagement_service: Arc<dyn EngagementServiceTrait>,
    ) -> Self {
        Self {
            usage_repository,
            engagement_service,
        }
    }
}

#[async_trait::async_trait]
impl UsageServiceTrait for UsageServiceImpl {
    async fn record_usage(&self, request: RecordUsageRequest) -> Result<UsageRecord, UsageError> {
        let tokens = NormalizedTokens::from_usage(request.usage.as_ref());
        let cost = calculate_cost(&request.model_id, tokens.input, tokens.output);

        let record = UsageRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: request.user_id,
            session_id: request.session_id,
            provider: request.provider,
            model_id: request.model_id,
            operation: request.operation,
            feature: request.feature,
            input_tokens: tokens.input,
            output_tokens: tokens.output,
            total_tokens: tokens.total,
            input_cost: cost.input_cost,
            output_cost: cost.output_cost,
            total_cost: cost.total_cost,
            currency: cost.currency,
            metadata: request.metadata,
            duration_ms: request.duration_ms,
        };

        let record = self.usage_repository.insert(record).await?;
        tracing::debug!(
            usage_record_id = %record.id,
            model_id = %record.model_id,
            operation = %record.operation,
            total_tokens = record.total_tokens,
            total_cost = record.total_cost,
            "Recorded usage"
        );

        if let Some(directive) = request.engagement {
            let metadata = &record.metadata;
            self.engagement_service
                .record_event(RecordEngagementRequest {
                    user_id: record.user_id.clone(),
                    session_id: record.session_id.clone(),
                    provider: record.provider.clone(),
                    model_id: record.model_id.clone(),
                    language_id: metadata.language_id.clone(),
                    operation: record.operation.clone(),
                    feature: record.feature.clone(),
                    action: directive.action,
                    xp_delta: directive.xp_delta,
                    functionality: metadata.functionality.clone(),
                    learning_mode: metadata.learning_mode.clone(),
                    learning_level: metadata.learning_level.clone(),
                })
                .await
                .map_err(|e| UsageError::Engagement(e.to_string()))?;
        }

        Ok(record)
    }

    async fn get_usage_record(&self, id: Uuid) -> Result<UsageRecord, UsageError> {
        self.usage_repository
            .get(id)
            .await?
            .ok_or(UsageError::NotFound(id))
    }

    async fn list_usage(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, usize), UsageError> {
        Ok(self.usage_repository.list(filter, page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::EngagementServiceImpl;
    use crate::progress::ProgressServiceImpl;
    use crate::test_utils::{
        InMemoryEngagementRepository, InMemoryProgressRepository, InMemoryUsageRepository,
    };

    struct Fixture {
        service: UsageServiceImpl,
        engagement: Arc<EngagementServiceImpl>,
    }

    fn fixture() -> Fixture {
        let progress = Arc::new(ProgressServiceImpl::new(Arc::new(
            InMemoryProgressRepository::default(),
        )));
        let engagement = Arc::new(EngagementServiceImpl::new(
            Arc::new(InMemoryEngagementRepository::default()),
            progress,
        ));
        let service = UsageServiceImpl::new(
            Arc::new(InMemoryUsageRepository::default()),
            engagement.clone(),
        );
        Fixture {
            service,
            engagement,
        }
    }

    fn request(model_id: &str, usage: Option<AdapterUsage>) -> RecordUsageRequest {
        RecordUsageRequest {
            user_id: "u1".to_string(),
            session_id: Some("s1".to_string()),
            provider: "google".to_string(),
            model_id: model_id.to_string(),
            operation: "translate_text".to_string(),
            feature: "translator".to_string(),
            usage,
            metadata: UsageMetadata {
                language_id: Some("es".to_string()),
                learning_mode: Some("translate".to_string()),
                ..Default::default()
            },
            duration_ms: Some(120),
            engagement: None,
        }
    }

    #[tokio::test]
    async fn test_record_usage_computes_cost() {
        let fixture = fixture();
        let usage = AdapterUsage {
            input_tokens: 1000,
            output_tokens: 500,
            total_tokens: None,
        };

        let record = fixture
            .service
            .record_usage(request("gemini-2.5-flash", Some(usage)))
            .await
            .unwrap();

        assert_eq!(record.total_tokens, 1500);
        assert!((record.total_cost - 0.000875).abs() < 1e-12);
        assert_eq!(record.currency, "USD");
        assert_eq!(
            fixture.service.get_usage_record(record.id).await.unwrap(),
            record
        );
    }

    #[tokio::test]
    async fn test_record_usage_without_usage_or_pricing() {
        let fixture = fixture();
        let record = fixture
            .service
            .record_usage(request("some-local-model", None))
            .await
            .unwrap();

        assert_eq!(
            (record.input_tokens, record.output_tokens, record.total_tokens),
            (0, 0, 0)
        );
        assert_eq!(record.total_cost, 0.0);

        let (records, total) = fixture
            .service
            .list_usage(&RecordFilter::default(), Page::all())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(records[0].id, record.id);
    }

    #[tokio::test]
    async fn test_engagement_directive_links_event() {
        let fixture = fixture();
        let mut req = request("gemini-2.5-flash", None);
        req.engagement = Some(EngagementDirective {
            action: "translate_text".to_string(),
            xp_delta: Some(0),
        });

        let record = fixture.service.record_usage(req).await.unwrap();

        let (events, _) = fixture
            .engagement
            .list_events(&RecordFilter::default(), Page::all())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.user_id, record.user_id);
        assert_eq!(event.session_id, record.session_id);
        assert_eq!(event.provider, record.provider);
        assert_eq!(event.model_id, record.model_id);
        assert_eq!(event.language_id.as_deref(), Some("es"));
        assert_eq!(event.learning_mode.as_deref(), Some("translate"));
    }

    #[tokio::test]
    async fn test_no_engagement_without_directive() {
        let fixture = fixture();
        fixture
            .service
            .record_usage(request("gemini-2.5-flash", None))
            .await
            .unwrap();

        let (_, total) = fixture
            .engagement
            .list_events(&RecordFilter::default(), Page::all())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let fixture = fixture();
        let err = fixture
            .service
            .get_usage_record(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, UsageError::NotFound(_)));
    }
}
