//! Generator boundary
//!
//! The core only decides which instructions go with which content; the
//! hosted model call lives behind the [`Generator`] trait. Failures are
//! passed through as [`RagError::Generation`](crate::errors::RagError)
//! without retry.

pub mod gemini;
pub mod ollama;
pub mod prompts;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::EvidenceSet;

pub use gemini::GeminiGenerator;
pub use ollama::OllamaGenerator;
pub use prompts::{GenerationMode, Prompt};

/// Language model used to answer queries
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a fully built prompt to the model and return its text
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Provider/model label used in logs
    fn name(&self) -> &str;

    /// Answer `query`, grounded in `context` when it holds any evidence
    async fn generate(&self, query: &str, context: Option<&EvidenceSet>) -> Result<String> {
        let prompt = Prompt::for_query(query, context);
        self.complete(&prompt).await
    }
}
