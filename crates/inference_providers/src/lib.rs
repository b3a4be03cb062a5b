//! Inference providers crate for the generative-AI text capability
//!
//! This crate hides the third-party model API behind a single trait so the
//! learning services can be exercised against the real Gemini backend or a
//! scripted mock without changing any calling code.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inference_providers::{ChatCompletionParams, ChatMessage, InferenceProvider};
//!
//! async fn example<P: InferenceProvider>(provider: P) {
//!     let params = ChatCompletionParams::new(
//!         "gemini-2.5-flash",
//!         vec![ChatMessage::user("Translate 'hola' into English")],
//!     )
//!     .json();
//!
//!     let response = provider.chat_completion(params).await?;
//!     println!("{:?} ({:?})", response.content, response.usage);
//! }
//! ```

pub mod external;
pub mod mock;
pub mod models;

use async_trait::async_trait;

// Re-export commonly used types for convenience
pub use mock::{MockProvider, RequestMatcher, UsageMode};
pub use models::{
    ChatCompletionParams, ChatCompletionResponse, ChatMessage, CompletionError, FinishReason,
    MessageRole, ResponseFormat, TokenUsage,
};

// External provider exports
pub use external::{BackendConfig, ExternalBackend, ExternalProvider, GeminiBackend};

/// A provider capable of answering a structured prompt with text plus token usage.
///
/// Calls are single request/response round trips: no streaming, no retries.
/// A failure surfaces immediately to the caller.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Short provider label recorded alongside usage (e.g. "google")
    fn provider_name(&self) -> &str;

    /// Performs a non-streaming chat completion request
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}
