//! Fixed-size character window chunker

use serde::{Deserialize, Serialize};

use crate::ingest::loader::Document;
use crate::types::{ChunkMetadata, NewChunk};

/// Chunking configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows; must be below `chunk_size`
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Splits documents into overlapping windows
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Chunk every document, tagging each piece with its source and position
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<NewChunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split(&doc.content)
                    .into_iter()
                    .enumerate()
                    .map(move |(i, text)| {
                        NewChunk::new(
                            text,
                            ChunkMetadata::new(doc.source.clone()).with("chunk_index", i),
                        )
                    })
            })
            .collect()
    }

    /// Split text into windows, skipping whitespace-only pieces
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size.max(1);
        let step = size.saturating_sub(self.config.chunk_overlap).max(1);

        let mut pieces = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + size).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            if !piece.trim().is_empty() {
                pieces.push(piece.trim().to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }
        pieces
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        })
    }

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(chunker(100, 10).split("hello world"), vec!["hello world"]);
    }

    #[test]
    fn test_windows_overlap() {
        let pieces = chunker(4, 2).split("abcdefgh");
        assert_eq!(pieces, vec!["abcd", "cdef", "efgh"]);
    }

    #[test]
    fn test_whitespace_only_is_skipped() {
        assert!(chunker(10, 0).split("   \n\n  ").is_empty());
        assert!(chunker(10, 0).split("").is_empty());
    }

    #[test]
    fn test_multibyte_characters() {
        let pieces = chunker(2, 0).split("héllo");
        assert_eq!(pieces, vec!["hé", "ll", "o"]);
    }

    #[test]
    fn test_chunk_documents_metadata() {
        let docs = vec![Document {
            source: "guide.md".to_string(),
            content: "abcdef".to_string(),
        }];
        let chunks = chunker(3, 0).chunk_documents(&docs);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.source, "guide.md");
        assert_eq!(chunks[1].metadata.extra["chunk_index"], 1);
        assert_eq!(chunks[1].content, "def");
    }
}
