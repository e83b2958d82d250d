//! Query embedding
//!
//! This module provides an abstraction over embedding providers with:
//! - A trait for different embedding backends
//! - An OpenAI-compatible HTTP backend

mod http_backend;

pub use http_backend::*;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one non-empty text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the model name
    fn model_name(&self) -> &str;
}
