use super::Embedder;
use crate::config::OpenAiConfig;
use crate::error::{Error, Provider, Result};
use crate::openai_backend::OpenAiClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
    model_id: String,
}

impl OpenAiEmbedder {
    pub fn new(client: Arc<OpenAiClient>, config: &OpenAiConfig) -> Self {
        Self {
            client,
            model_id: config.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let embedding = self.client.embed(&self.model_id, text).await?;
        if embedding.is_empty() {
            return Err(Error::provider(
                Provider::Embedding,
                format!("model '{}' returned an empty vector", self.model_id),
            ));
        }

        debug!(
            "Embedded {} chars into {} dimensions",
            text.chars().count(),
            embedding.len()
        );
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}
