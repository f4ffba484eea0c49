// Retrieval engine: thin, honest wrapper over the embedding index
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{RagError, Result};
use crate::index::EmbeddingIndex;
use crate::types::RetrievalResult;

/// Default number of candidates requested from the index
pub const DEFAULT_TOP_K: usize = 5;

/// Search parameters for retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of results to retrieve
    pub top_k: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Retriever over an [`EmbeddingIndex`]
///
/// Scores and ordering are passed through exactly as the index reports
/// them. Index failures surface as [`RagError::Retrieval`] without retry.
pub struct Retriever {
    index: Arc<dyn EmbeddingIndex>,
    params: SearchParams,
}

impl Retriever {
    /// Create new retriever with the default result bound
    pub fn new(index: Arc<dyn EmbeddingIndex>) -> Self {
        Self::with_params(index, SearchParams::default())
    }

    /// Create with custom search parameters
    pub fn with_params(index: Arc<dyn EmbeddingIndex>, params: SearchParams) -> Self {
        Self { index, params }
    }

    /// Fetch candidate chunks for a query
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalResult> {
        let result = self
            .index
            .search(query, self.params.top_k)
            .await
            .map_err(|e| match e {
                RagError::Retrieval(_) => e,
                other => RagError::Retrieval(other.to_string()),
            })?;

        debug!(top_k = self.params.top_k, returned = result.len(), "index search complete");
        Ok(result)
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }
}
