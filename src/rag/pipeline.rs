// End-to-end retrieval-augmented response pipeline
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{RagError, Result};
use crate::generation::Generator;
use crate::index::EmbeddingIndex;
use crate::rag::assembler::{LastResponseSlot, ResponseAssembler};
use crate::rag::filter::{RelevanceFilter, DEFAULT_THRESHOLD};
use crate::rag::retrieval::{Retriever, SearchParams};
use crate::rag::selector::ToolSelector;
use crate::types::{LastTrace, ResponseRecord, ToolUsed};

/// RAG pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Search parameters for retrieval
    pub search: SearchParams,
    /// Relevance a chunk must strictly exceed to count as evidence
    pub threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Query → retrieve → filter → select tool → generate → assemble
///
/// Every step runs in sequence and any failure aborts the query: no
/// partial record is produced and the last-response slot is untouched.
pub struct RagPipeline {
    retriever: Retriever,
    filter: RelevanceFilter,
    selector: ToolSelector,
    generator: Arc<dyn Generator>,
    last_response: LastResponseSlot,
}

impl RagPipeline {
    /// Create pipeline with default configuration
    pub fn new(index: Arc<dyn EmbeddingIndex>, generator: Arc<dyn Generator>) -> Self {
        Self::with_config(index, generator, PipelineConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        index: Arc<dyn EmbeddingIndex>,
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever: Retriever::with_params(index, config.search),
            filter: RelevanceFilter::new(config.threshold),
            selector: ToolSelector::new(),
            generator,
            last_response: LastResponseSlot::new(),
        }
    }

    /// Answer a query and remember it as the most recent response
    ///
    /// Blank input fails with [`RagError::InvalidQuery`] before the index is
    /// touched.
    pub async fn process_query(&self, query: &str) -> Result<ResponseRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::InvalidQuery("Query must not be empty".to_string()));
        }

        let mut assembler = ResponseAssembler::new(query);

        assembler.record("Retrieving relevant chunks...");
        let retrieved = self.retriever.retrieve(query).await.map_err(|e| {
            warn!(error = %e, "retrieval failed");
            e
        })?;
        let retrieved_count = retrieved.len();

        let evidence = self.filter.filter(retrieved);
        let tool = self.selector.select(&evidence);

        match tool {
            ToolUsed::None => assembler.record(format!(
                "No relevant chunks found ({} retrieved, none above threshold {:.2})",
                retrieved_count,
                self.filter.threshold()
            )),
            ToolUsed::Rag => assembler.record(format!(
                "Retrieved {} chunks, {} above threshold {:.2}",
                retrieved_count,
                evidence.len(),
                self.filter.threshold()
            )),
        }
        assembler.record(format!("Agent detected tool: {}", tool));
        assembler.select(tool, &evidence);
        info!(%tool, retrieved = retrieved_count, evidence = evidence.len(), "tool selected");

        assembler.record("Generating response with LLM...");
        let context = match tool {
            ToolUsed::Rag => Some(&evidence),
            ToolUsed::None => None,
        };
        let text = self.generator.generate(query, context).await.map_err(|e| {
            warn!(error = %e, generator = self.generator.name(), "generation failed");
            e
        })?;
        assembler.record("LLM response generated");

        let record = assembler.finish(text);
        debug!(id = %record.id, steps = record.trace.len(), "response assembled");
        self.last_response.store(record.clone());
        Ok(record)
    }

    /// Trace of the most recent completed query
    pub fn get_last_trace(&self) -> LastTrace {
        self.last_response.trace()
    }

    /// Most recent completed response
    pub fn last_response(&self) -> Option<ResponseRecord> {
        self.last_response.latest()
    }

    pub fn threshold(&self) -> f32 {
        self.filter.threshold()
    }

    /// Change the relevance threshold for subsequent queries
    ///
    /// Values outside [0, 1] are rejected and leave the current one in place.
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        self.filter.set_threshold(threshold)
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }
}
