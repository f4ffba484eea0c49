//! Embedding index collaborator
//!
//! Stores chunks with metadata and answers nearest-neighbour searches.
//! The pipeline only depends on the [`EmbeddingIndex`] trait; the bundled
//! implementation is an ephemeral in-memory store.

pub mod memory;
mod similarity;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{NewChunk, RetrievalResult};

pub use memory::InMemoryIndex;

/// Nearest-neighbour store for content chunks
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Store chunks; every chunk must carry a non-empty `metadata.source`
    async fn add(&self, chunks: Vec<NewChunk>) -> Result<()>;

    /// Return at most `k` chunks in descending relevance
    async fn search(&self, query: &str, k: usize) -> Result<RetrievalResult>;

    /// Drop every stored chunk so the index can be populated again
    async fn reset(&self) -> Result<()>;

    /// Number of stored chunks
    async fn len(&self) -> usize;
}
