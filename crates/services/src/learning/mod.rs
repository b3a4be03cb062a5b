pub mod adapter;
pub mod ports;
pub mod prompts;

pub use adapter::ProviderLearningAdapter;
pub use ports::*;

use crate::common::snippet;
use crate::models::{ModelsService, ResolvedModel};
use crate::usage::{
    AdapterUsage, EngagementDirective, RecordUsageRequest, UsageMetadata, UsageServiceTrait,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Longest text kept in usage metadata
const METADATA_SNIPPET_CHARS: usize = 500;

pub struct LearningServiceImpl {
    models_service: Arc<dyn ModelsService>,
    usage_service: Arc<dyn UsageServiceTrait>,
}

/// A finished adapter call, ready to be recorded
struct CallRecord<'a> {
    context: &'a LearningContext,
    model: &'a ResolvedModel,
    operation: LearningOperation,
    metadata: UsageMetadata,
    usage: Option<AdapterUsage>,
    duration_ms: u64,
    engagement: Option<EngagementDirective>,
}

impl LearningServiceImpl {
    pub fn new(
        models_service: Arc<dyn ModelsService>,
        usage_service: Arc<dyn UsageServiceTrait>,
    ) -> Self {
        Self {
            models_service,
            usage_service,
        }
    }

    fn base_metadata(context: &LearningContext, language_id: Option<&str>) -> UsageMetadata {
        UsageMetadata {
            language_id: language_id.map(str::to_string),
            learning_mode: context.learning_mode.clone(),
            learning_level: context.learning_level.clone(),
            functionality: context.functionality.clone(),
            ..Default::default()
        }
    }

    async fn record(&self, call: CallRecord<'_>) -> Result<Uuid, LearningError> {
        let record = self
            .usage_service
            .record_usage(RecordUsageRequest {
                user_id: call.context.user_id.clone(),
                session_id: call.context.session_id.clone(),
                provider: call.model.descriptor.provider.clone(),
                model_id: call.model.descriptor.id.clone(),
                operation: call.operation.as_str().to_string(),
                feature: call.operation.feature().to_string(),
                usage: call.usage,
                metadata: call.metadata,
                duration_ms: Some(call.duration_ms),
                engagement: call.engagement,
            })
            .await?;
        Ok(record.id)
    }

    /// Pass a successful adapter response through. A failed call is still
    /// recorded, with zero tokens and `status = "error"`, before the error is
    /// returned.
    async fn settle<T>(
        &self,
        context: &LearningContext,
        model: &ResolvedModel,
        operation: LearningOperation,
        metadata: &UsageMetadata,
        started: Instant,
        result: Result<AdapterResponse<T>, AdapterError>,
    ) -> Result<AdapterResponse<T>, LearningError> {
        let err = match result {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        tracing::error!(
            model_id = %model.descriptor.id,
            operation = operation.as_str(),
            error = %err,
            "AI call failed"
        );
        let mut metadata = metadata.clone();
        metadata
            .extra
            .insert("status".to_string(), serde_json::json!("error"));
        metadata
            .extra
            .insert("error".to_string(), serde_json::json!(err.to_string()));
        self.record(CallRecord {
            context,
            model,
            operation,
            metadata,
            usage: None,
            duration_ms: elapsed_ms(started),
            engagement: None,
        })
        .await?;

        Err(err.into())
    }

    /// Attach a word breakdown to one generated item. Failures leave the item
    /// without analysis.
    async fn enrich_item(
        &self,
        context: &LearningContext,
        model: &ResolvedModel,
        language: &str,
        item: ContentItem,
    ) -> GeneratedItem {
        let request = AnalyzeWordsRequest {
            text: item.text.clone(),
            language: language.to_string(),
        };
        let mut metadata = Self::base_metadata(context, Some(language));
        metadata.source_text = Some(snippet(&item.text, METADATA_SNIPPET_CHARS));

        let started = Instant::now();
        let result = model.adapter.analyze_words_for_learning(&request).await;
        let operation = LearningOperation::AnalyzeWords;
        let mut generated = GeneratedItem::from(item);

        match self
            .settle(context, model, operation, &metadata, started, result)
            .await
        {
            Ok(response) => {
                let recorded = self
                    .record(CallRecord {
                        context,
                        model,
                        operation,
                        metadata,
                        usage: response.usage,
                        duration_ms: elapsed_ms(started),
                        engagement: None,
                    })
                    .await;
                if let Err(e) = recorded {
                    tracing::warn!(error = %e, "Failed to record word analysis usage");
                }
                generated.words = Some(response.result);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    text = %generated.text,
                    "Word analysis failed, returning item without it"
                );
            }
        }
        generated
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn answer_xp(is_correct: bool) -> i64 {
    if is_correct {
        XP_CORRECT_ANSWER
    } else {
        XP_ATTEMPT
    }
}

fn directive(operation: LearningOperation, xp_delta: i64) -> Option<EngagementDirective> {
    Some(EngagementDirective {
        action: operation.as_str().to_string(),
        xp_delta: Some(xp_delta),
    })
}

#[async_trait::async_trait]
impl LearningServiceTrait for LearningServiceImpl {
    async fn generate_content(
        &self,
        context: LearningContext,
        request: GenerateContentRequest,
        with_word_analysis: bool,
    ) -> Result<LearningOutcome<Vec<GeneratedItem>>, LearningError> {
        let operation = LearningOperation::GenerateContent;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;
        tracing::debug!(model_id = %model.descriptor.id, language = %request.language, "Generating content");

        let mut metadata = Self::base_metadata(&context, Some(&request.language));
        if metadata.learning_mode.is_none() {
            metadata.learning_mode = Some(request.mode.clone());
        }
        if metadata.learning_level.is_none() {
            metadata.learning_level = Some(request.level.clone());
        }
        if let Some(topic) = &request.topic {
            metadata
                .extra
                .insert("topic".to_string(), serde_json::json!(topic));
        }

        let started = Instant::now();
        let result = model.adapter.generate_content(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        metadata
            .extra
            .insert("item_count".to_string(), serde_json::json!(response.result.len()));
        let xp_awarded = 0;
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        let items = if with_word_analysis {
            join_all(response.result.into_iter().map(|item| {
                self.enrich_item(&context, &model, &request.language, item)
            }))
            .await
        } else {
            response.result.into_iter().map(GeneratedItem::from).collect()
        };

        Ok(LearningOutcome {
            result: items,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }

    async fn translate_text(
        &self,
        context: LearningContext,
        request: TranslateRequest,
    ) -> Result<LearningOutcome<Translation>, LearningError> {
        let operation = LearningOperation::TranslateText;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;

        let mut metadata = translation_metadata(&context, &request);
        let started = Instant::now();
        let result = model.adapter.translate_text(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        metadata.translated_text = Some(snippet(
            &response.result.translated_text,
            METADATA_SNIPPET_CHARS,
        ));
        let xp_awarded = 0;
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        Ok(LearningOutcome {
            result: response.result,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }

    async fn translate_with_analysis(
        &self,
        context: LearningContext,
        request: TranslateRequest,
    ) -> Result<LearningOutcome<TranslationWithAnalysis>, LearningError> {
        let operation = LearningOperation::TranslateWithAnalysis;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;

        let mut metadata = translation_metadata(&context, &request);
        let started = Instant::now();
        let result = model.adapter.translate_with_analysis(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        metadata.translated_text = Some(snippet(
            &response.result.translated_text,
            METADATA_SNIPPET_CHARS,
        ));
        metadata
            .extra
            .insert("word_count".to_string(), serde_json::json!(response.result.words.len()));
        let xp_awarded = 0;
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        Ok(LearningOutcome {
            result: response.result,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }

    async fn check_answer(
        &self,
        context: LearningContext,
        request: CheckAnswerRequest,
    ) -> Result<LearningOutcome<AnswerCheck>, LearningError> {
        let operation = LearningOperation::CheckAnswer;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;

        let mut metadata = answer_metadata(&context, &request);
        let started = Instant::now();
        let result = model.adapter.check_answer(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        metadata
            .extra
            .insert("is_correct".to_string(), serde_json::json!(response.result.is_correct));
        let xp_awarded = answer_xp(response.result.is_correct);
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        Ok(LearningOutcome {
            result: response.result,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }

    async fn check_answer_detailed(
        &self,
        context: LearningContext,
        request: CheckAnswerRequest,
    ) -> Result<LearningOutcome<DetailedAnswerCheck>, LearningError> {
        let operation = LearningOperation::CheckAnswerDetailed;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;

        let mut metadata = answer_metadata(&context, &request);
        let started = Instant::now();
        let result = model.adapter.check_answer_detailed(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        metadata
            .extra
            .insert("is_correct".to_string(), serde_json::json!(response.result.is_correct));
        metadata
            .extra
            .insert("score".to_string(), serde_json::json!(response.result.score));
        let xp_awarded = answer_xp(response.result.is_correct);
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        Ok(LearningOutcome {
            result: response.result,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }

    async fn analyze_words(
        &self,
        context: LearningContext,
        request: AnalyzeWordsRequest,
    ) -> Result<LearningOutcome<Vec<WordAnalysis>>, LearningError> {
        let operation = LearningOperation::AnalyzeWords;
        let model = self
            .models_service
            .resolve_adapter(context.model_id.as_deref())
            .await?;

        let mut metadata = Self::base_metadata(&context, Some(&request.language));
        metadata.source_text = Some(snippet(&request.text, METADATA_SNIPPET_CHARS));
        let started = Instant::now();
        let result = model.adapter.analyze_words_for_learning(&request).await;
        let response = self
            .settle(&context, &model, operation, &metadata, started, result)
            .await?;

        let xp_awarded = 0;
        let usage_record_id = self
            .record(CallRecord {
                context: &context,
                model: &model,
                operation,
                metadata,
                usage: response.usage,
                duration_ms: elapsed_ms(started),
                engagement: directive(operation, xp_awarded),
            })
            .await?;

        Ok(LearningOutcome {
            result: response.result,
            usage_record_id,
            model_id: model.descriptor.id,
            xp_awarded,
        })
    }
}

fn translation_metadata(context: &LearningContext, request: &TranslateRequest) -> UsageMetadata {
    let mut metadata =
        LearningServiceImpl::base_metadata(context, Some(&request.target_language));
    metadata.source_text = Some(snippet(&request.text, METADATA_SNIPPET_CHARS));
    metadata.source_language = Some(request.source_language.clone());
    metadata.target_language = Some(request.target_language.clone());
    metadata
}

fn answer_metadata(context: &LearningContext, request: &CheckAnswerRequest) -> UsageMetadata {
    let mut metadata = LearningServiceImpl::base_metadata(context, Some(&request.language));
    metadata.source_text = Some(snippet(&request.answer, METADATA_SNIPPET_CHARS));
    metadata
}
