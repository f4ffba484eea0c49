//! Document ingestion
//!
//! Reads plain-text documents from a directory and cuts them into
//! overlapping character windows ready for the embedding index.

pub mod chunker;
pub mod loader;

pub use chunker::{ChunkConfig, Chunker};
pub use loader::{Document, DocumentLoader};
