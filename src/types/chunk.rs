//! Chunk types produced by the embedding index
//!
//! A [`Chunk`] is immutable once fetched and lives only as long as the
//! query that retrieved it.

use serde::{Deserialize, Serialize};

/// Metadata attached to every stored chunk
///
/// `source` is mandatory; anything else the loader records (chunk index,
/// byte offsets, ...) travels in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChunkMetadata {
    /// Metadata with only a source identifier
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Attach an additional metadata field
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Chunk content before it has been stored and scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl NewChunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// A stored chunk returned by a search, scored against the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    /// Similarity reported by the index, in [0, 1]; higher is more relevant
    pub relevance_score: f32,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata, relevance_score: f32) -> Self {
        Self {
            content: content.into(),
            metadata,
            relevance_score,
        }
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }
}

/// Search output in the order the index returned it (descending relevance)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    chunks: Vec<Chunk>,
}

impl RetrievalResult {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}

impl From<Vec<Chunk>> for RetrievalResult {
    fn from(chunks: Vec<Chunk>) -> Self {
        Self::new(chunks)
    }
}

/// Chunks that passed the relevance threshold, input order preserved
///
/// Only the relevance filter builds one, so holding an `EvidenceSet`
/// means the threshold has already been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceSet {
    chunks: Vec<Chunk>,
}

impl EvidenceSet {
    pub(crate) fn from_filtered(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_extra_fields_flatten() {
        let meta = ChunkMetadata::new("handbook.md").with("chunk_index", 3);
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["source"], "handbook.md");
        assert_eq!(json["chunk_index"], 3);
    }

    #[test]
    fn test_metadata_requires_source() {
        let parsed: std::result::Result<ChunkMetadata, _> =
            serde_json::from_str(r#"{"chunk_index": 1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_retrieval_result_preserves_order() {
        let result = RetrievalResult::from(vec![
            Chunk::new("a", ChunkMetadata::new("one.txt"), 0.9),
            Chunk::new("b", ChunkMetadata::new("two.txt"), 0.5),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.chunks()[0].source(), "one.txt");
        assert_eq!(result.chunks()[1].source(), "two.txt");
    }
}
