//! storyqa: retrieval-augmented question answering over a hosted vector
//! index, a single-turn chatbot, and an endpoint smoke check.

pub mod backend;
pub mod chat;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod llm;
pub mod openai_backend;
pub mod progress;
pub mod rag;
pub mod store;
