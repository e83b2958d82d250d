use super::{ChatMessage, ChatModel};
use crate::config::OpenAiConfig;
use crate::error::Result;
use crate::openai_backend::OpenAiClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct OpenAiChatModel {
    client: Arc<OpenAiClient>,
    model_id: String,
}

impl OpenAiChatModel {
    pub fn new(client: Arc<OpenAiClient>, config: &OpenAiConfig) -> Self {
        Self {
            client,
            model_id: config.chat_model.clone(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            "Requesting completion from {} with {} messages",
            self.model_id,
            messages.len()
        );
        self.client.chat_completion(&self.model_id, messages).await
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}
