//! Language model seam

use async_trait::async_trait;
use comanda_client::{GeminiClient, GeminiConfig};
use shared::{AppError, AppResult};

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete one prompt
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Gemini-backed model
pub struct GeminiModel {
    client: GeminiClient,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        Ok(Self {
            client: GeminiClient::new(config)?,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        tracing::debug!(
            model = self.client.model(),
            chars = prompt.len(),
            "Calling language model"
        );
        self.client
            .generate(prompt)
            .await
            .map_err(|e| AppError::advisory(e.to_string()))
    }
}
