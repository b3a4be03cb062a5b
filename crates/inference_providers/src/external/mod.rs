//! External provider module for third-party AI providers
//!
//! ```text
//! ExternalProvider (implements InferenceProvider)
//!     └── backends:
//!         └── GeminiBackend
//! ```
//!
//! Adding a provider with a different API format means adding a backend file
//! implementing `ExternalBackend`.

pub mod backend;
pub mod gemini;

use crate::{ChatCompletionParams, ChatCompletionResponse, CompletionError, InferenceProvider};
use async_trait::async_trait;

pub use backend::{BackendConfig, ExternalBackend};
pub use gemini::GeminiBackend;

/// Provider that forwards requests to a third-party API through a backend
pub struct ExternalProvider {
    provider_name: String,
    backend: Box<dyn ExternalBackend>,
    config: BackendConfig,
}

impl ExternalProvider {
    pub fn new(
        provider_name: impl Into<String>,
        backend: Box<dyn ExternalBackend>,
        config: BackendConfig,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            backend,
            config,
        }
    }

    /// Gemini provider labelled "google"
    pub fn gemini(config: BackendConfig) -> Self {
        Self::new("google", Box::new(GeminiBackend::new()), config)
    }
}

#[async_trait]
impl InferenceProvider for ExternalProvider {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let model = params.model.clone();
        tracing::debug!(
            backend = self.backend.backend_type(),
            model = %model,
            "Forwarding chat completion to external backend"
        );
        self.backend
            .chat_completion(&self.config, &model, params)
            .await
    }
}
