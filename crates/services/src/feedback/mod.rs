pub mod ports;

pub use ports::*;

use crate::common::{Page, RecordFilter};
use crate::usage::UsageRepository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedbackServiceImpl {
    feedback_repository: Arc<dyn FeedbackRepository>,
    usage_repository: Arc<dyn UsageRepository>,
}

impl FeedbackServiceImpl {
    pub fn new(
        feedback_repository: Arc<dyn FeedbackRepository>,
        usage_repository: Arc<dyn UsageRepository>,
    ) -> Self {
        Self {
            feedback_repository,
            usage_repository,
        }
    }
}

fn validate_comment(comment: Option<String>) -> Result<Option<String>, FeedbackError> {
    let Some(comment) = comment else {
        return Ok(None);
    };
    let comment = comment.trim();
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(FeedbackError::Validation(format!(
            "comment must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok((!comment.is_empty()).then(|| comment.to_string()))
}

#[async_trait::async_trait]
impl FeedbackServiceTrait for FeedbackServiceImpl {
    async fn record_feedback(
        &self,
        request: RecordFeedbackRequest,
    ) -> Result<FeedbackRecord, FeedbackError> {
        let comment = validate_comment(request.comment)?;

        let usage = self
            .usage_repository
            .get(request.usage_record_id)
            .await?
            .ok_or(FeedbackError::UsageRecordNotFound(request.usage_record_id))?;

        if let Some(feedback_id) = request.feedback_id {
            if let Some(existing) = self.feedback_repository.get(feedback_id).await? {
                if existing.usage_record_id != usage.id {
                    return Err(FeedbackError::Validation(format!(
                        "feedback {feedback_id} belongs to usage record {}",
                        existing.usage_record_id
                    )));
                }
                let patch = FeedbackPatch {
                    signal: Some(request.signal),
                    reason: request.reason,
                    comment,
                    xp_delta: request.xp_delta,
                    touchpoint: Some(request.touchpoint),
                };
                let updated = self
                    .feedback_repository
                    .update(feedback_id, patch, Utc::now())
                    .await?
                    .ok_or(FeedbackError::NotFound(feedback_id))?;
                tracing::debug!(feedback_id = %updated.id, "Updated feedback in place");
                return Ok(updated);
            }
            tracing::debug!(%feedback_id, "No feedback with this id yet, creating it");
        }

        let metadata = usage.metadata;
        let context = FeedbackContext {
            source_text: metadata.source_text,
            source_language: metadata.source_language,
            target_language: metadata.target_language,
            translated_text: metadata.translated_text,
        };
        let now = Utc::now();
        let reason = match request.signal {
            FeedbackSignal::Negative => request.reason,
            _ => None,
        };

        let record = FeedbackRecord {
            id: request.feedback_id.unwrap_or_else(Uuid::new_v4),
            usage_record_id: usage.id,
            user_id: request.user_id.unwrap_or(usage.user_id),
            session_id: request.session_id.or(usage.session_id),
            provider: usage.provider,
            model_id: usage.model_id,
            language_id: metadata.language_id,
            operation: usage.operation,
            feature: usage.feature,
            touchpoint: request.touchpoint,
            signal: request.signal,
            reason,
            comment,
            xp_delta: request.xp_delta,
            functionality: metadata.functionality,
            learning_mode: metadata.learning_mode,
            learning_level: metadata.learning_level,
            context: (!context.is_empty()).then_some(context),
            created_at: now,
            updated_at: now,
        };

        let record = self.feedback_repository.insert(record).await?;
        tracing::info!(
            feedback_id = %record.id,
            usage_record_id = %record.usage_record_id,
            signal = record.signal.as_str(),
            "Recorded feedback"
        );
        Ok(record)
    }

    async fn update_feedback(
        &self,
        id: Uuid,
        mut patch: FeedbackPatch,
    ) -> Result<FeedbackRecord, FeedbackError> {
        patch.comment = validate_comment(patch.comment)?;

        self.feedback_repository
            .update(id, patch, Utc::now())
            .await?
            .ok_or(FeedbackError::NotFound(id))
    }

    async fn list_feedback(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<(Vec<FeedbackRecord>, usize), FeedbackError> {
        Ok(self.feedback_repository.list(filter, page).await?)
    }
}
