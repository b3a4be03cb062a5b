//! Backend trait for external provider implementations
//!
//! Each backend handles the API-specific translation between our internal
//! chat format and the provider's native format.

use crate::{ChatCompletionParams, ChatCompletionResponse, CompletionError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Configuration for a backend connection
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL for the provider API
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: i64,
    /// Provider-specific extra configuration
    pub extra: HashMap<String, String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_seconds: 120,
            extra: HashMap::new(),
        }
    }
}

/// Internal backend trait for different API formats
#[async_trait]
pub trait ExternalBackend: Send + Sync {
    /// Returns the backend type identifier (e.g., "gemini")
    fn backend_type(&self) -> &'static str;

    /// Performs a non-streaming chat completion request
    ///
    /// The backend is responsible for:
    /// - Translating ChatCompletionParams to provider-specific format
    /// - Making the HTTP request
    /// - Parsing the response and translating it back to ChatCompletionResponse
    async fn chat_completion(
        &self,
        config: &BackendConfig,
        model: &str,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}
