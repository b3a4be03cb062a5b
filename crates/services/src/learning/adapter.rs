use super::ports::*;
use super::prompts;
use crate::usage::AdapterUsage;
use inference_providers::{ChatCompletionParams, ChatMessage, CompletionError, InferenceProvider};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_TEMPERATURE: f32 = 0.4;

/// `LearningAdapter` backed by a chat-completion provider
pub struct ProviderLearningAdapter {
    provider: Arc<dyn InferenceProvider>,
    model_id: String,
    temperature: f32,
}

impl ProviderLearningAdapter {
    pub fn new(provider: Arc<dyn InferenceProvider>, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<AdapterResponse<T>, AdapterError> {
        let params = ChatCompletionParams::new(&self.model_id, messages)
            .json()
            .with_temperature(self.temperature);

        let response = self.provider.chat_completion(params).await?;
        let content = response.content.ok_or(CompletionError::NoContent)?;
        let value = extract_json(&content)?;
        let result = serde_json::from_value(value).map_err(|e| {
            AdapterError::InvalidOutput(format!("unexpected JSON shape: {e}"))
        })?;

        Ok(AdapterResponse {
            result,
            usage: response.usage.as_ref().map(AdapterUsage::from_token_usage),
        })
    }
}

/// Parse the first JSON object or array in `text`, ignoring anything around it
/// such as markdown fences.
pub(crate) fn extract_json(text: &str) -> Result<serde_json::Value, AdapterError> {
    let start = text
        .find(['{', '['])
        .ok_or_else(|| AdapterError::InvalidOutput("reply contains no JSON".to_string()))?;

    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or_else(|| AdapterError::InvalidOutput("reply contains no JSON".to_string()))?
        .map_err(|e| AdapterError::InvalidOutput(format!("malformed JSON: {e}")))
}

/// Lists come back either bare or wrapped in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum ListReply<T> {
    Bare(Vec<T>),
    Items { items: Vec<T> },
    Words { words: Vec<T> },
}

impl<T> ListReply<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListReply::Bare(items) => items,
            ListReply::Items { items } => items,
            ListReply::Words { words } => words,
        }
    }
}

fn unwrap_list<T>(response: AdapterResponse<ListReply<T>>) -> AdapterResponse<Vec<T>> {
    AdapterResponse {
        result: response.result.into_vec(),
        usage: response.usage,
    }
}

#[async_trait::async_trait]
impl LearningAdapter for ProviderLearningAdapter {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<AdapterResponse<Vec<ContentItem>>, AdapterError> {
        let response = self.complete(prompts::generate_content(request)).await?;
        Ok(unwrap_list(response))
    }

    async fn translate_text(
        &self,
        request: &TranslateRequest,
    ) -> Result<AdapterResponse<Translation>, AdapterError> {
        self.complete(prompts::translate_text(request)).await
    }

    async fn translate_with_analysis(
        &self,
        request: &TranslateRequest,
    ) -> Result<AdapterResponse<TranslationWithAnalysis>, AdapterError> {
        self.complete(prompts::translate_with_analysis(request))
            .await
    }

    async fn check_answer(
        &self,
        request: &CheckAnswerRequest,
    ) -> Result<AdapterResponse<AnswerCheck>, AdapterError> {
        self.complete(prompts::check_answer(request)).await
    }

    async fn check_answer_detailed(
        &self,
        request: &CheckAnswerRequest,
    ) -> Result<AdapterResponse<DetailedAnswerCheck>, AdapterError> {
        let mut response: AdapterResponse<DetailedAnswerCheck> =
            self.complete(prompts::check_answer_detailed(request)).await?;
        response.result.score = response.result.score.clamp(0.0, 100.0);
        Ok(response)
    }

    async fn analyze_words_for_learning(
        &self,
        request: &AnalyzeWordsRequest,
    ) -> Result<AdapterResponse<Vec<WordAnalysis>>, AdapterError> {
        let response = self.complete(prompts::analyze_words(request)).await?;
        Ok(unwrap_list(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_providers::{MockProvider, RequestMatcher, TokenUsage, UsageMode};

    fn adapter(provider: MockProvider) -> (ProviderLearningAdapter, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        (
            ProviderLearningAdapter::new(provider.clone(), "gemini-2.5-flash"),
            provider,
        )
    }

    fn translate_request() -> TranslateRequest {
        TranslateRequest {
            text: "Good morning".to_string(),
            source_language: "en".to_string(),
            target_language: "es".to_string(),
        }
    }

    #[test]
    fn test_extract_json_skips_fences() {
        let value = extract_json("```json\n{\"a\": [1, 2]}\n```").unwrap();
        assert_eq!(value["a"][1], 2);

        let value = extract_json("Sure! [\"x\"] hope this helps").unwrap();
        assert_eq!(value[0], "x");
    }

    #[test]
    fn test_extract_json_rejects_prose() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(AdapterError::InvalidOutput(_))
        ));
        assert!(matches!(
            extract_json("{\"unterminated\": "),
            Err(AdapterError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_requests_json_and_maps_usage() {
        let (adapter, provider) = adapter(
            MockProvider::new()
                .with_response(
                    RequestMatcher::Contains(LearningOperation::TranslateText.task_marker()),
                    r#"{"translated_text": "Buenos días"}"#,
                )
                .with_usage(UsageMode::Fixed(TokenUsage::new(1000, 500))),
        );

        let response = adapter.translate_text(&translate_request()).await.unwrap();
        assert_eq!(response.result.translated_text, "Buenos días");
        assert_eq!(
            response.usage,
            Some(AdapterUsage {
                input_tokens: 1000,
                output_tokens: 500,
                total_tokens: Some(1500),
            })
        );

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.5-flash");
        assert_eq!(
            requests[0].response_format,
            inference_providers::ResponseFormat::Json
        );
    }

    #[tokio::test]
    async fn test_lists_accept_wrapped_and_bare_replies() {
        let (adapter, _) = adapter(
            MockProvider::new()
                .with_response(
                    RequestMatcher::Contains(LearningOperation::GenerateContent.task_marker()),
                    r#"{"items": [{"text": "Hola", "translation": "Hello"}]}"#,
                )
                .with_response(
                    RequestMatcher::Contains(LearningOperation::AnalyzeWords.task_marker()),
                    r#"[{"word": "hola", "translation": "hello", "part_of_speech": "interjection"}]"#,
                ),
        );

        let content = adapter
            .generate_content(&GenerateContentRequest {
                language: "es".to_string(),
                mode: "sentences".to_string(),
                level: "beginner".to_string(),
                topic: None,
                count: 1,
            })
            .await
            .unwrap();
        assert_eq!(content.result.len(), 1);
        assert_eq!(content.result[0].hint, None);

        let words = adapter
            .analyze_words_for_learning(&AnalyzeWordsRequest {
                text: "hola".to_string(),
                language: "es".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(words.result[0].part_of_speech.as_deref(), Some("interjection"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_invalid_output() {
        let (adapter, _) =
            adapter(MockProvider::new().with_response(RequestMatcher::Any, "no json here"));
        let err = adapter.translate_text(&translate_request()).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let (adapter, _) = adapter(MockProvider::new());
        let err = adapter.translate_text(&translate_request()).await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Completion(CompletionError::NoContent)
        ));
    }

    #[tokio::test]
    async fn test_detailed_score_is_clamped() {
        let (adapter, _) = adapter(MockProvider::new().with_response(
            RequestMatcher::Any,
            r#"{"is_correct": true, "score": 140, "feedback": "Perfect", "corrections": []}"#,
        ));
        let response = adapter
            .check_answer_detailed(&CheckAnswerRequest {
                prompt: "Say hello".to_string(),
                expected: None,
                answer: "Hola".to_string(),
                language: "es".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.result.score, 100.0);
    }
}
