//! Ephemeral in-memory embedding index
//!
//! Chunks are embedded on insert and scored against the query embedding by
//! cosine similarity at search time. Nothing is persisted; a process that
//! restarts re-ingests its documents.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::similarity;
use super::EmbeddingIndex;
use crate::embedding::Embedder;
use crate::errors::{RagError, Result};
use crate::types::{Chunk, ChunkMetadata, NewChunk, RetrievalResult};

#[derive(Debug, Clone)]
struct StoredChunk {
    id: Uuid,
    content: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
    norm: f32,
}

/// In-memory index backed by an [`Embedder`]
pub struct InMemoryIndex {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<StoredChunk>>,
}

impl InMemoryIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Ids assigned to stored chunks, in insertion order
    pub async fn ids(&self) -> Vec<Uuid> {
        self.entries.read().await.iter().map(|e| e.id).collect()
    }
}

#[async_trait]
impl EmbeddingIndex for InMemoryIndex {
    async fn add(&self, chunks: Vec<NewChunk>) -> Result<()> {
        if chunks.is_empty() {
            debug!("no chunks provided to add to the index");
            return Ok(());
        }

        if let Some(bad) = chunks.iter().position(|c| c.metadata.source.trim().is_empty()) {
            return Err(RagError::Configuration(format!(
                "chunk {} has no source in its metadata",
                bad
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Retrieval(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let mut entries = self.entries.write().await;
        let dims = entries
            .first()
            .map(|e| e.embedding.len())
            .or_else(|| vectors.first().map(|v| v.len()))
            .unwrap_or(0);

        let mut staged = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(vectors) {
            if embedding.is_empty() || embedding.len() != dims {
                return Err(RagError::Retrieval(format!(
                    "embedding dims mismatch for '{}': expected {}, got {}",
                    chunk.metadata.source,
                    dims,
                    embedding.len()
                )));
            }
            let norm = similarity::l2_norm(&embedding);
            staged.push(StoredChunk {
                id: Uuid::new_v4(),
                content: chunk.content,
                metadata: chunk.metadata,
                embedding,
                norm,
            });
        }

        let added = staged.len();
        entries.extend(staged);
        info!(added, total = entries.len(), embedder = self.embedder.name(), "chunks indexed");
        Ok(())
    }

    async fn search(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        if self.entries.read().await.is_empty() {
            return Err(empty_index());
        }

        // Lock is not held while embedding
        let query_vector = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .pop()
            .ok_or_else(|| RagError::Retrieval("embedder returned no query vector".to_string()))?;

        let entries = self.entries.read().await;
        if entries.is_empty() {
            return Err(empty_index());
        }
        let dims = entries[0].embedding.len();
        if query_vector.len() != dims {
            return Err(RagError::Retrieval(format!(
                "query embedding has {} dims, index has {}",
                query_vector.len(),
                dims
            )));
        }
        let query_norm = similarity::l2_norm(&query_vector);

        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                (
                    i,
                    similarity::relevance(&query_vector, &e.embedding, query_norm, e.norm),
                )
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        let chunks = scored
            .into_iter()
            .map(|(i, score)| {
                let entry = &entries[i];
                Chunk::new(entry.content.clone(), entry.metadata.clone(), score)
            })
            .collect();

        Ok(RetrievalResult::new(chunks))
    }

    async fn reset(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("index reset");
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn empty_index() -> RagError {
    RagError::Retrieval("index is empty; add documents before querying".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// Bag-of-words embedder over a fixed vocabulary
    struct KeywordEmbedder;

    const VOCAB: [&str; 4] = ["product", "price", "warranty", "office"];

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    VOCAB
                        .iter()
                        .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect())
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    /// Resets the shared index from inside `embed`; deadlocks if search holds the lock
    struct ResettingEmbedder {
        index: OnceLock<Arc<InMemoryIndex>>,
    }

    #[async_trait]
    impl Embedder for ResettingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if let Some(index) = self.index.get() {
                index.reset().await?;
            }
            KeywordEmbedder.embed(texts).await
        }

        fn name(&self) -> &str {
            "resetting"
        }
    }

    fn chunk(content: &str, source: &str) -> NewChunk {
        NewChunk::new(content, ChunkMetadata::new(source))
    }

    fn index() -> InMemoryIndex {
        InMemoryIndex::new(Arc::new(KeywordEmbedder))
    }

    #[tokio::test]
    async fn test_search_empty_index_is_error() {
        let index = index();
        let err = index.search("product", 5).await.unwrap_err();
        assert!(matches!(err, RagError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_search_orders_by_relevance() {
        let index = index();
        index
            .add(vec![
                chunk("The office is in Berlin", "about.md"),
                chunk("Our product price is fair", "pricing.md"),
                chunk("The product ships worldwide", "shipping.md"),
            ])
            .await
            .unwrap();

        let result = index.search("product price", 5).await.unwrap();
        let sources: Vec<&str> = result.chunks().iter().map(|c| c.source()).collect();

        assert_eq!(sources, vec!["pricing.md", "shipping.md", "about.md"]);
        assert!((result.chunks()[0].relevance_score - 1.0).abs() < 1e-6);
        assert_eq!(result.chunks()[2].relevance_score, 0.0);
    }

    #[tokio::test]
    async fn test_search_respects_k_and_ties_keep_insertion_order() {
        let index = index();
        index
            .add(vec![
                chunk("warranty terms", "a.md"),
                chunk("warranty claims", "b.md"),
                chunk("warranty length", "c.md"),
            ])
            .await
            .unwrap();

        let result = index.search("warranty", 2).await.unwrap();
        let sources: Vec<&str> = result.chunks().iter().map(|c| c.source()).collect();
        assert_eq!(sources, vec!["a.md", "b.md"]);
    }

    #[tokio::test]
    async fn test_add_rejects_missing_source() {
        let index = index();
        let err = index.add(vec![chunk("text", "  ")]).await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(index.len().await, 0);
    }

    #[tokio::test]
    async fn test_query_embedding_runs_outside_the_lock() {
        let embedder = Arc::new(ResettingEmbedder {
            index: OnceLock::new(),
        });
        let index = Arc::new(InMemoryIndex::new(embedder.clone()));
        index.add(vec![chunk("product", "a.md")]).await.unwrap();
        let _ = embedder.index.set(index.clone());

        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            index.search("product", 5),
        )
        .await
        .expect("search blocked while embedding the query");

        assert!(matches!(outcome, Err(RagError::Retrieval(_))));
        assert_eq!(index.len().await, 0);
    }

    #[tokio::test]
    async fn test_reset_allows_reinitialisation() {
        let index = index();
        index.add(vec![chunk("product", "a.md")]).await.unwrap();
        assert_eq!(index.len().await, 1);

        index.reset().await.unwrap();
        assert_eq!(index.len().await, 0);

        index.add(vec![chunk("product", "a.md")]).await.unwrap();
        assert_eq!(index.len().await, 1);
        assert_eq!(index.ids().await.len(), 1);
    }
}
