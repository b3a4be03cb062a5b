use async_trait::async_trait;
use services::common::RepositoryError;
use services::models::AiSettingsRepository;
use tokio::sync::RwLock;

/// Process-wide AI settings singleton
#[derive(Default)]
pub struct InMemorySettingsRepository {
    active_model_id: RwLock<Option<String>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AiSettingsRepository for InMemorySettingsRepository {
    async fn get_active_model_id(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.active_model_id.read().await.clone())
    }

    async fn set_active_model_id(&self, model_id: &str) -> Result<(), RepositoryError> {
        *self.active_model_id.write().await = Some(model_id.to_string());
        Ok(())
    }
}
