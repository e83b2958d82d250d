//! Chat completion
//!
//! A [`ChatModel`] turns an ordered list of messages into one completion.
//! Conversations are never carried across calls.

mod http_backend;

pub use http_backend::*;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Trait for chat completion providers
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete the conversation, returning the first candidate's text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Single-turn helper: one system instruction plus one user message
pub async fn complete_single_turn(
    model: &dyn ChatModel,
    system_prompt: &str,
    user_content: &str,
) -> Result<String> {
    let messages = [
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_content),
    ];
    model.complete(&messages).await
}
