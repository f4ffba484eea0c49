//! RagBuddy - answer questions over a local document corpus
//!
//! Each query is embedded and matched against an in-memory index. Chunks
//! scoring above a relevance threshold become evidence; when there is any,
//! the model answers from that context (tool `RAG`), otherwise from its
//! general knowledge (tool `none`). The steps taken are kept as a trace
//! that can be inspected after the query.
//!
//! # Architecture
//!
//! - **rag**: retriever, relevance filter, tool selector, response assembler, pipeline
//! - **index** / **embedding**: vector store and embedding providers
//! - **generation**: prompt construction and language-model providers
//! - **ingest**: document loading and chunking
//! - **bootstrap** / **config** / **cli** / **repl**: wiring and user interface

pub mod errors;
pub mod types;

// Collaborators
pub mod embedding;
pub mod generation;
pub mod index;
pub mod ingest;

// Query pipeline
pub mod rag;

// Wiring and interface
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod logging;
pub mod repl;

// Re-export commonly used types
pub use errors::{RagError, Result};
pub use rag::RagPipeline;
pub use types::{LastTrace, ResponseRecord, ToolUsed};
