//! Retrieve-then-generate question answering
//!
//! A query runs embed → retrieve → compose → generate. Each step is a
//! single provider call and the first failure aborts the run.

use crate::embed::Embedder;
use crate::error::Result;
use crate::llm::{complete_single_turn, ChatModel};
use crate::store::{RetrievedFragment, Retriever};
use serde::Serialize;
use tracing::{error, info};

/// Join fragment texts with a single newline, in retrieval order
pub fn compose_context(fragments: &[RetrievedFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user prompt for answer generation
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "Using the provided story context, answer the question:\n\nContext:\n{}\n\nQuestion: {}\nAnswer:",
        context, query
    )
}

/// Generates an answer from a query and its retrieved context
pub struct AnswerGenerator<'a> {
    model: &'a dyn ChatModel,
    system_prompt: String,
}

impl<'a> AnswerGenerator<'a> {
    pub fn new(model: &'a dyn ChatModel, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
        }
    }

    pub async fn generate(&self, query: &str, context: &str) -> Result<String> {
        info!("Creating prompt with retrieved context");
        let prompt = build_prompt(query, context);

        info!("Sending request to {}", self.model.model_name());
        match complete_single_turn(self.model, &self.system_prompt, &prompt).await {
            Ok(answer) => {
                info!("Successfully generated answer");
                info!("Answer: {}", answer);
                Ok(answer)
            }
            Err(e) => {
                error!("Error generating answer: {}", e);
                Err(e)
            }
        }
    }
}

/// Outcome of one question-answering run
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    pub query: String,
    pub answer: String,
    pub fragments: Vec<RetrievedFragment>,
}

/// Sequences embedding, retrieval and generation for one query
pub struct RagPipeline<'a> {
    embedder: &'a dyn Embedder,
    retriever: &'a dyn Retriever,
    generator: AnswerGenerator<'a>,
    top_k: usize,
}

impl<'a> RagPipeline<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        retriever: &'a dyn Retriever,
        generator: AnswerGenerator<'a>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            retriever,
            generator,
            top_k,
        }
    }

    /// Answer a query from retrieved context
    pub async fn answer(&self, query: &str) -> Result<RagAnswer> {
        info!("Generating answer for query: {}", query);

        info!("Retrieving top {} chunks for query: {}", self.top_k, query);
        let vector = self.embedder.embed(query).await?;
        let fragments = self.retriever.retrieve(&vector, self.top_k).await?;

        let context = compose_context(&fragments);
        let answer = self.generator.generate(query, &context).await?;

        Ok(RagAnswer {
            query: query.to_string(),
            answer,
            fragments,
        })
    }
}
