// Retrieval Engine Module
pub mod engine;

pub use engine::{Retriever, SearchParams, DEFAULT_TOP_K};
