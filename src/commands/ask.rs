//! Ask command implementation

use crate::config::{Config, Secrets};
use crate::embed::OpenAiEmbedder;
use crate::error::{Error, Result};
use crate::llm::OpenAiChatModel;
use crate::openai_backend::OpenAiClient;
use crate::progress::add_spinner;
use crate::rag::{AnswerGenerator, RagAnswer, RagPipeline};
use crate::store::{print_fragments, PineconeIndex};
use std::sync::Arc;
use tracing::info;

/// Ask options
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Number of fragments to retrieve (defaults to `query.top_k`)
    pub top_k: Option<usize>,
    /// Show a spinner while waiting on providers
    pub show_progress: bool,
}

/// Answer one question from the vector index
pub async fn cmd_ask(
    config: &Config,
    secrets: &Secrets,
    query: &str,
    options: AskOptions,
) -> Result<RagAnswer> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let top_k = options.top_k.unwrap_or(config.query.top_k);
    if top_k == 0 {
        return Err(Error::Config("top_k must be >= 1".to_string()));
    }

    let openai_key = secrets.openai_api_key()?;
    let index_key = secrets.index_api_key()?;

    let client = Arc::new(OpenAiClient::new(
        &config.openai.base_url,
        openai_key,
        config.timeout(),
    )?);
    let embedder = OpenAiEmbedder::new(Arc::clone(&client), &config.openai);
    let chat = OpenAiChatModel::new(client, &config.openai);

    let spinner = add_spinner("Connecting to index", options.show_progress);
    let result: Result<RagAnswer> = async {
        let index = PineconeIndex::connect(&config.index, index_key, config.timeout()).await?;

        spinner.set_message(format!("Answering from index {}", index.name()));
        let generator = AnswerGenerator::new(&chat, config.query.system_prompt.clone());
        let pipeline = RagPipeline::new(&embedder, &index, generator, top_k);
        pipeline.answer(query).await
    }
    .await;
    spinner.finish_and_clear();

    if let Ok(answer) = &result {
        info!(
            "Answered query with {} fragments of context",
            answer.fragments.len()
        );
    }
    result
}

/// Print an answer to console
pub fn print_answer(answer: &RagAnswer, show_sources: bool) {
    println!("\nQuestion: {}\nAnswer: {}", answer.query, answer.answer);

    if show_sources {
        println!("\nSources:");
        print_fragments(&answer.fragments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Provider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn secrets(config: &Config, openai: &str, index: &str) -> Secrets {
        let openai = openai.to_string();
        let index = index.to_string();
        Secrets::from_lookup(config, move |name| match name {
            "OPENAI_API_KEY" => Some(openai.clone()),
            "PINECONE_API_KEY" => Some(index.clone()),
            _ => None,
        })
    }

    async fn mount_openai(server: &MockServer, answer: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"embedding": [0.1, 0.2, 0.3]}]})),
            )
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": answer}}]
            })))
            .mount(server)
            .await;
    }

    fn config_for(openai: &MockServer, index: &MockServer) -> Config {
        let mut config = Config::default();
        config.openai.base_url = openai.uri();
        config.index.host = Some(index.uri());
        config
    }

    #[tokio::test]
    async fn test_ask_end_to_end() {
        let openai = MockServer::start().await;
        mount_openai(&openai, "Team A won the competition.").await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [{
                    "role": "system",
                    "content": "You are an AI that extracts answers from given text."
                }, {
                    "role": "user",
                    "content": "Using the provided story context, answer the question:\n\nContext:\nTeam A won the final match.\nThe event was held in May.\n\nQuestion: Who won the competition?\nAnswer:"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Team A."}}]
            })))
            .with_priority(1)
            .expect(1)
            .mount(&openai)
            .await;

        let index = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(json!({"vector": [0.1, 0.2, 0.3], "topK": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    {"id": "1", "score": 0.92, "metadata": {"text": "Team A won the final match."}},
                    {"id": "2", "score": 0.81, "metadata": {"text": "The event was held in May."}}
                ]
            })))
            .expect(1)
            .mount(&index)
            .await;

        let config = config_for(&openai, &index);
        let secrets = secrets(&config, "sk-test", "pc-test");
        let answer = cmd_ask(&config, &secrets, "Who won the competition?", AskOptions::default())
            .await
            .unwrap();

        assert_eq!(answer.answer, "Team A.");
        assert_eq!(answer.fragments.len(), 2);
    }

    #[tokio::test]
    async fn test_ask_missing_secret_makes_no_request() {
        let openai = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&openai)
            .await;
        let index = MockServer::start().await;

        let config = config_for(&openai, &index);
        let secrets = secrets(&config, "sk-test", "");
        let err = cmd_ask(&config, &secrets, "anything", AskOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_ask_index_failure_skips_generation() {
        let openai = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"embedding": [1.0]}]})),
            )
            .mount(&openai)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&openai)
            .await;

        let index = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&index)
            .await;

        let config = config_for(&openai, &index);
        let secrets = secrets(&config, "sk-test", "pc-test");
        let err = cmd_ask(&config, &secrets, "q", AskOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.provider_kind(), Some(Provider::Index));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_query_and_zero_k() {
        let config = Config::default();
        let secrets = secrets(&config, "sk-test", "pc-test");

        let err = cmd_ask(&config, &secrets, "  ", AskOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));

        let options = AskOptions {
            top_k: Some(0),
            ..Default::default()
        };
        let err = cmd_ask(&config, &secrets, "q", options).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
