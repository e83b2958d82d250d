//! Vector index retrieval
//!
//! This module wraps the hosted vector index and provides:
//! - The [`Retriever`] seam used by the RAG pipeline
//! - A Pinecone REST implementation
//! - Fragment parsing from match metadata

mod payload;
mod pinecone;

pub use payload::*;
pub use pinecone::*;

use crate::backend::truncate_chars;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Characters of each fragment shown in retrieval logs
pub const PREVIEW_CHARS: usize = 100;

/// Trait for top-K nearest-neighbour retrieval
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `top_k` fragments, best match first
    async fn retrieve(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedFragment>>;
}

/// Short single-line preview of a fragment for logs
pub fn preview(text: &str) -> String {
    let cut = match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    };
    format!("{}...", cut.replace('\n', " "))
}

fn log_fragments(fragments: &[RetrievedFragment]) {
    info!("Retrieved {} relevant chunks", fragments.len());
    for (i, fragment) in fragments.iter().enumerate() {
        info!("Chunk {} preview: {}", i + 1, preview(&fragment.text));
    }
}

/// Print fragments to console
pub fn print_fragments(fragments: &[RetrievedFragment]) {
    for (i, f) in fragments.iter().enumerate() {
        println!(
            "{}. [score: {:.3}] {}",
            i + 1,
            f.score,
            truncate_chars(&f.text.replace('\n', " "), 200)
        );
    }
}
