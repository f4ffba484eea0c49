//! Type definitions module
//!
//! Records passed between the retriever, filter, generator and callers.

pub mod chunk;
pub mod response;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkMetadata, EvidenceSet, NewChunk, RetrievalResult};
pub use response::{LastTrace, ResponseRecord, RetrievedChunk, ToolUsed};
