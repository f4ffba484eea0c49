// RAG (Retrieval-Augmented Generation) pipeline
//
// Components:
// - Retriever: nearest-neighbour search through the embedding index
// - Relevance Filter: strict threshold over retrieved chunks
// - Tool Selector: grounded vs ungrounded generation
// - Assembler: response record, per-query trace and last-response slot
// - Pipeline: end-to-end orchestration

pub mod assembler;
pub mod filter;
pub mod pipeline;
pub mod retrieval;
pub mod selector;

// Re-export key types
pub use assembler::{LastResponseSlot, ResponseAssembler};
pub use filter::{RelevanceFilter, DEFAULT_THRESHOLD};
pub use pipeline::{PipelineConfig, RagPipeline};
pub use retrieval::{Retriever, SearchParams, DEFAULT_TOP_K};
pub use selector::{SelectorState, ToolSelector};
