//! Chat command implementation

use crate::chat::{ChatLoop, ChatSummary};
use crate::config::{Config, Secrets};
use crate::error::Result;
use crate::llm::OpenAiChatModel;
use crate::openai_backend::OpenAiClient;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Run the interactive chatbot on stdin/stdout
pub async fn cmd_chat(config: &Config, secrets: &Secrets) -> Result<ChatSummary> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_chat(config, secrets, &mut stdin.lock(), &mut stdout.lock()).await
}

/// Run the chatbot over arbitrary line input and output
pub async fn run_chat<R: BufRead, W: Write>(
    config: &Config,
    secrets: &Secrets,
    input: &mut R,
    out: &mut W,
) -> Result<ChatSummary> {
    let api_key = secrets.openai_api_key()?;
    let client = Arc::new(OpenAiClient::new(
        &config.openai.base_url,
        api_key,
        config.timeout(),
    )?);
    let model = OpenAiChatModel::new(client, &config.openai);

    info!("=== Starting Simple Chatbot ===");
    writeln!(
        out,
        "Welcome to the chatbot! Type 'exit' or 'quit' to end the conversation."
    )?;

    let mut chat = ChatLoop::new(&model, config.chat.system_prompt.clone());
    let summary = chat.run(input, out).await?;

    info!(
        "=== Finished Simple Chatbot ({} answered, {} failed) ===",
        summary.answered, summary.failed
    );
    Ok(summary)
}
