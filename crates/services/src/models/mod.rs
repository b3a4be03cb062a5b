pub mod ports;

use std::sync::Arc;

use async_trait::async_trait;
pub use ports::{
    AiSettingsRepository, ModelDescriptor, ModelInfo, ModelsError, ModelsService, ResolvedModel,
};

use crate::learning::LearningAdapter;

/// Maps model ids to adapters and tracks the active selection
pub struct ModelRegistry {
    /// Registration order
    models: Vec<ResolvedModel>,
    default_model_id: String,
    settings_repository: Arc<dyn AiSettingsRepository>,
}

impl ModelRegistry {
    pub fn new(
        default_model_id: impl Into<String>,
        settings_repository: Arc<dyn AiSettingsRepository>,
    ) -> Self {
        Self {
            models: Vec::new(),
            default_model_id: default_model_id.into(),
            settings_repository,
        }
    }

    /// Register a model, replacing any earlier registration with the same id
    pub fn register(&mut self, descriptor: ModelDescriptor, adapter: Arc<dyn LearningAdapter>) {
        let model = ResolvedModel {
            descriptor,
            adapter,
        };
        match self
            .models
            .iter_mut()
            .find(|m| m.descriptor.id == model.descriptor.id)
        {
            Some(existing) => *existing = model,
            None => self.models.push(model),
        }
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model_id
    }

    fn find(&self, model_id: &str) -> Option<&ResolvedModel> {
        self.models.iter().find(|m| m.descriptor.id == model_id)
    }
}

#[async_trait]
impl ModelsService for ModelRegistry {
    async fn get_active_model_id(&self) -> Result<String, ModelsError> {
        let persisted = self.settings_repository.get_active_model_id().await?;
        match persisted {
            Some(id) if self.find(&id).is_some() => Ok(id),
            Some(id) => {
                tracing::warn!(
                    model_id = %id,
                    default = %self.default_model_id,
                    "Active model is no longer registered, using default"
                );
                Ok(self.default_model_id.clone())
            }
            None => Ok(self.default_model_id.clone()),
        }
    }

    fn get_adapter_by_id(&self, model_id: &str) -> Result<ResolvedModel, ModelsError> {
        self.find(model_id)
            .cloned()
            .ok_or_else(|| ModelsError::NotRegistered(model_id.to_string()))
    }

    async fn set_active_model(&self, model_id: &str) -> Result<ModelInfo, ModelsError> {
        let model = self.get_adapter_by_id(model_id)?;
        self.settings_repository
            .set_active_model_id(model_id)
            .await?;
        tracing::info!(model_id, "Active model changed");
        Ok(ModelInfo::from_descriptor(&model.descriptor, true))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ModelsError> {
        let active = self.get_active_model_id().await?;
        Ok(self
            .models
            .iter()
            .map(|m| ModelInfo::from_descriptor(&m.descriptor, m.descriptor.id == active))
            .collect())
    }

    async fn resolve_adapter(&self, model_id: Option<&str>) -> Result<ResolvedModel, ModelsError> {
        match model_id {
            Some(id) => self.get_adapter_by_id(id),
            None => {
                let active = self.get_active_model_id().await?;
                self.get_adapter_by_id(&active)
            }
        }
    }
}
