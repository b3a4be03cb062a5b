//! Mock implementation of InferenceProvider for testing
//!
//! Responses are scripted per request matcher so that tests (and local runs
//! without an API key) get deterministic JSON replies and token counts.

use crate::{
    ChatCompletionParams, ChatCompletionResponse, CompletionError, FinishReason,
    InferenceProvider, TokenUsage,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Request matcher for conditional responses
#[derive(Clone, Debug)]
pub enum RequestMatcher {
    /// Match any request
    Any,
    /// Match requests whose combined message text contains the given substring
    Contains(String),
}

impl RequestMatcher {
    /// Check if this matcher matches the given parameters
    pub fn matches(&self, params: &ChatCompletionParams) -> bool {
        match self {
            Self::Any => true,
            Self::Contains(needle) => params.prompt_text().contains(needle.as_str()),
        }
    }
}

/// How the mock reports token usage
#[derive(Clone, Copy, Debug)]
pub enum UsageMode {
    /// Prompt and completion tokens are the whitespace-separated word counts
    WordCount,
    /// Always report the given usage
    Fixed(TokenUsage),
    /// Report no usage at all
    Missing,
}

pub struct MockProvider {
    provider_name: String,
    responses: RwLock<Vec<(RequestMatcher, String)>>,
    usage_mode: RwLock<UsageMode>,
    failure: RwLock<Option<CompletionError>>,
    requests: RwLock<Vec<ChatCompletionParams>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            provider_name: "mock".to_string(),
            responses: RwLock::new(Vec::new()),
            usage_mode: RwLock::new(UsageMode::WordCount),
            failure: RwLock::new(None),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Report a different provider label
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Add a scripted response; earlier matchers take precedence
    pub fn with_response(mut self, matcher: RequestMatcher, content: impl Into<String>) -> Self {
        self.responses.get_mut().push((matcher, content.into()));
        self
    }

    pub fn with_usage(mut self, mode: UsageMode) -> Self {
        *self.usage_mode.get_mut() = mode;
        self
    }

    pub async fn set_response(&self, matcher: RequestMatcher, content: impl Into<String>) {
        self.responses.write().await.insert(0, (matcher, content.into()));
    }

    pub async fn set_usage(&self, mode: UsageMode) {
        *self.usage_mode.write().await = mode;
    }

    /// Fail every request with `error` until cleared with `None`
    pub async fn set_failure(&self, error: Option<CompletionError>) {
        *self.failure.write().await = error;
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<ChatCompletionParams> {
        self.requests.read().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        self.requests.write().await.push(params.clone());

        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }

        let content = self
            .responses
            .read()
            .await
            .iter()
            .find(|(matcher, _)| matcher.matches(&params))
            .map(|(_, content)| content.clone())
            .ok_or(CompletionError::NoContent)?;

        let usage = match *self.usage_mode.read().await {
            UsageMode::WordCount => Some(TokenUsage::new(
                params.prompt_text().split_whitespace().count() as i32,
                content.split_whitespace().count() as i32,
            )),
            UsageMode::Fixed(usage) => Some(usage),
            UsageMode::Missing => None,
        };

        Ok(ChatCompletionResponse {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            model: params.model,
            content: Some(content),
            finish_reason: Some(FinishReason::Stop),
            usage,
        })
    }
}
