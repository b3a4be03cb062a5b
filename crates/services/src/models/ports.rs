use crate::common::RepositoryError;
use crate::learning::LearningAdapter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Static description of a registered model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModelDescriptor {
    /// The model identifier, which can be referenced in the API endpoints
    pub id: String,
    pub display_name: String,
    /// Provider label stored on usage records, e.g. "google"
    pub provider: String,
    pub description: Option<String>,
}

/// Registered model annotated with the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
    pub provider: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl ModelInfo {
    pub fn from_descriptor(descriptor: &ModelDescriptor, is_active: bool) -> Self {
        Self {
            id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            provider: descriptor.provider.clone(),
            description: descriptor.description.clone(),
            is_active,
        }
    }
}

/// A registered model together with its adapter
#[derive(Clone)]
pub struct ResolvedModel {
    pub descriptor: ModelDescriptor,
    pub adapter: Arc<dyn LearningAdapter>,
}

impl std::fmt::Debug for ResolvedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModel")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelsError {
    #[error("Model '{0}' is not registered")]
    NotRegistered(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[async_trait]
pub trait ModelsService: Send + Sync {
    /// Persisted selection when it is still registered, the configured default otherwise
    async fn get_active_model_id(&self) -> Result<String, ModelsError>;

    fn get_adapter_by_id(&self, model_id: &str) -> Result<ResolvedModel, ModelsError>;

    /// Select the model used by calls that do not name one
    async fn set_active_model(&self, model_id: &str) -> Result<ModelInfo, ModelsError>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ModelsError>;

    /// The explicitly requested model, or the active one
    async fn resolve_adapter(&self, model_id: Option<&str>) -> Result<ResolvedModel, ModelsError>;
}

/// Process-wide AI settings
#[async_trait]
pub trait AiSettingsRepository: Send + Sync {
    async fn get_active_model_id(&self) -> Result<Option<String>, RepositoryError>;

    async fn set_active_model_id(&self, model_id: &str) -> Result<(), RepositoryError>;
}
