use crate::backend::{self, build_client, send_json};
use crate::error::{Error, Provider, Result};
use crate::llm::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible embeddings + chat completions API
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = backend::base_url(base_url)
            .map_err(|e| Error::Config(format!("Invalid OpenAI base URL: {}", e)))?;
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid OpenAI base URL: {}", e)))
    }

    /// Embed a single text, returning the first embedding in the response
    pub async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>> {
        let url = self.endpoint("v1/embeddings")?;
        let request = EmbeddingRequest { model, input };
        let parsed: EmbeddingResponse = send_json(
            Provider::Embedding,
            self.client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::provider(Provider::Embedding, "response contained no embedding"))
    }

    /// Run a chat completion and return the first choice's content
    pub async fn chat_completion(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let url = self.endpoint("v1/chat/completions")?;
        let request = ChatCompletionRequest { model, messages };
        let parsed: ChatCompletionResponse = send_json(
            Provider::Chat,
            self.client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::provider(Provider::Chat, "response contained no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| Error::provider(Provider::Chat, "first choice has no content"))
    }
}
