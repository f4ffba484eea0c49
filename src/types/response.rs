//! Response record returned for every answered query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::chunk::Chunk;

/// Generation mode chosen for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolUsed {
    /// Answered from the model's general knowledge
    #[serde(rename = "none")]
    None,
    /// Answered from retrieved context
    #[serde(rename = "RAG")]
    Rag,
}

impl ToolUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolUsed::None => "none",
            ToolUsed::Rag => "RAG",
        }
    }
}

impl fmt::Display for ToolUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence entry as reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: String,
    pub relevance_score: f32,
}

impl From<&Chunk> for RetrievedChunk {
    fn from(chunk: &Chunk) -> Self {
        Self {
            content: chunk.content.clone(),
            source: chunk.metadata.source.clone(),
            relevance_score: chunk.relevance_score,
        }
    }
}

/// Complete, immutable result of one query
///
/// `tool_used` is `Rag` exactly when `retrieved_chunks` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub query: String,
    pub tool_used: ToolUsed,
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub result: String,
    pub trace: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// What a "show last trace" request sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastTrace {
    /// No query has completed on this pipeline yet
    NoPriorQuery,
    /// Trace of the most recent completed query
    Trace(Vec<String>),
}

impl LastTrace {
    pub fn entries(&self) -> Option<&[String]> {
        match self {
            LastTrace::NoPriorQuery => None,
            LastTrace::Trace(entries) => Some(entries),
        }
    }
}
