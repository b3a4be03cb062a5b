//! Gemini backend implementation
//!
//! This backend handles Google's Gemini API, translating between our
//! chat format and Gemini's native `generateContent` format.

use super::backend::{BackendConfig, ExternalBackend};
use crate::{
    ChatCompletionParams, ChatCompletionResponse, CompletionError, FinishReason, MessageRole,
    ResponseFormat, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gemini backend
pub struct GeminiBackend {
    client: Client,
}

impl GeminiBackend {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Convert chat messages to Gemini format
    fn convert_messages(
        messages: &[crate::ChatMessage],
    ) -> (Option<GeminiSystemInstruction>, Vec<GeminiContent>) {
        let mut system_instruction = None;
        let mut contents = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => {
                    // Gemini uses systemInstruction
                    system_instruction = Some(GeminiSystemInstruction {
                        parts: vec![GeminiPart {
                            text: msg.content.clone(),
                        }],
                    });
                }
                MessageRole::User => contents.push(GeminiContent {
                    role: "user".to_string(),
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                }),
                MessageRole::Assistant => {
                    // Gemini uses "model" role for assistant
                    contents.push(GeminiContent {
                        role: "model".to_string(),
                        parts: vec![GeminiPart {
                            text: msg.content.clone(),
                        }],
                    });
                }
            }
        }

        (system_instruction, contents)
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Map Gemini's finishReason to ours
///
/// Gemini uses: "STOP", "MAX_TOKENS", "SAFETY", "RECITATION", "OTHER"
fn map_finish_reason(finish_reason: Option<&String>) -> Option<FinishReason> {
    finish_reason.map(|r| match r.as_str() {
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    })
}

/// Strip vendor prefix from model name (e.g., "google/gemini-2.5-flash" -> "gemini-2.5-flash")
fn strip_vendor_prefix(model: &str) -> &str {
    if let Some(stripped) = model.strip_prefix("google/") {
        return stripped;
    }
    if let Some(stripped) = model.strip_prefix("vertex/") {
        return stripped;
    }
    model
}

/// Gemini part format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Gemini content format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini system instruction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

/// Gemini generation config
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

/// Gemini request format
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

/// Gemini response candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

/// Gemini usage metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: i32,
    #[serde(default)]
    candidates_token_count: i32,
    #[serde(default)]
    total_token_count: Option<i32>,
}

/// Gemini response format
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

impl From<GeminiUsageMetadata> for TokenUsage {
    fn from(meta: GeminiUsageMetadata) -> Self {
        let mut usage = TokenUsage::new(meta.prompt_token_count, meta.candidates_token_count);
        if let Some(total) = meta.total_token_count {
            usage.total_tokens = total;
        }
        usage
    }
}

#[async_trait]
impl ExternalBackend for GeminiBackend {
    fn backend_type(&self) -> &'static str {
        "gemini"
    }

    async fn chat_completion(
        &self,
        config: &BackendConfig,
        model: &str,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let model_name = strip_vendor_prefix(model);

        // Gemini API URL format: {base_url}/models/{model}:generateContent
        // API key is passed via x-goog-api-key header
        let url = format!("{}/models/{}:generateContent", config.base_url, model_name);

        let (system_instruction, contents) = Self::convert_messages(&params.messages);

        let response_mime_type = match params.response_format {
            ResponseFormat::Json => Some("application/json".to_string()),
            ResponseFormat::Text => None,
        };

        let generation_config = if params.temperature.is_some()
            || params.max_completion_tokens.is_some()
            || response_mime_type.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_completion_tokens,
                response_mime_type,
            })
        } else {
            None
        };

        let request = GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        };

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-goog-api-key",
            reqwest::header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| CompletionError::CompletionError(format!("Invalid API key: {e}")))?,
        );

        let timeout = std::time::Duration::from_secs(config.timeout_seconds.max(1) as u64);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::CompletionError(e.to_string()))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response body: {e}"));
            tracing::warn!(status_code, model = model_name, "Gemini request failed");
            return Err(CompletionError::HttpError {
                status_code,
                message: error_text,
            });
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| CompletionError::CompletionError(e.to_string()))?;

        let gemini_response: GeminiResponse = serde_json::from_slice(&raw_bytes)
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let candidate = gemini_response
            .candidates
            .first()
            .ok_or(CompletionError::NoContent)?;

        let content = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.trim().is_empty());

        Ok(ChatCompletionResponse {
            id: format!("gemini-{}", Uuid::new_v4()),
            model: model_name.to_string(),
            content,
            finish_reason: map_finish_reason(candidate.finish_reason.as_ref()),
            usage: gemini_response.usage_metadata.map(TokenUsage::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChatMessage, ExternalProvider, InferenceProvider};
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> BackendConfig {
        BackendConfig {
            base_url: server.base_url(),
            api_key: "test-key".to_string(),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_strip_vendor_prefix() {
        assert_eq!(strip_vendor_prefix("google/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(strip_vendor_prefix("vertex/gemini-2.5-pro"), "gemini-2.5-pro");
        assert_eq!(strip_vendor_prefix("gemini-2.5-flash"), "gemini-2.5-flash");
    }

    #[test]
    fn test_convert_messages_moves_system_prompt() {
        let (system, contents) = GeminiBackend::convert_messages(&[
            ChatMessage::system("You are a tutor"),
            ChatMessage::user("hola"),
        ]);
        assert_eq!(system.unwrap().parts[0].text, "You are a tutor");
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
    }

    #[tokio::test]
    async fn test_generate_content_maps_text_and_usage() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-2.5-flash:generateContent")
                    .header("x-goog-api-key", "test-key")
                    .body_contains("application/json");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "{\"translated\":"}, {"text": "\"hello\"}"}]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {
                        "promptTokenCount": 12,
                        "candidatesTokenCount": 4,
                        "totalTokenCount": 19
                    }
                }));
            })
            .await;

        let provider = ExternalProvider::gemini(config_for(&server));
        let params =
            ChatCompletionParams::new("google/gemini-2.5-flash", vec![ChatMessage::user("hola")])
                .json();
        let response = provider.chat_completion(params).await.unwrap();

        mock.assert_async().await;
        assert_eq!(provider.provider_name(), "google");
        assert_eq!(response.content.as_deref(), Some("{\"translated\":\"hello\"}"));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        // Provider-reported total wins over the computed sum
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 4);
        assert_eq!(usage.total_tokens, 19);
    }

    #[tokio::test]
    async fn test_missing_usage_metadata_yields_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
                }));
            })
            .await;

        let provider = ExternalProvider::gemini(config_for(&server));
        let response = provider
            .chat_completion(ChatCompletionParams::new(
                "gemini-2.5-flash",
                vec![ChatMessage::user("hi")],
            ))
            .await
            .unwrap();

        assert_eq!(response.content.as_deref(), Some("ok"));
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_propagated() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("quota exhausted");
            })
            .await;

        let provider = ExternalProvider::gemini(config_for(&server));
        let err = provider
            .chat_completion(ChatCompletionParams::new(
                "gemini-2.5-flash",
                vec![ChatMessage::user("hi")],
            ))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CompletionError::HttpError {
                status_code: 429,
                message: "quota exhausted".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_is_no_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({"candidates": []}));
            })
            .await;

        let provider = ExternalProvider::gemini(config_for(&server));
        let err = provider
            .chat_completion(ChatCompletionParams::new(
                "gemini-2.5-flash",
                vec![ChatMessage::user("hi")],
            ))
            .await
            .unwrap_err();

        assert_eq!(err, CompletionError::NoContent);
    }
}
