//! Text embedding providers
//!
//! The in-memory index turns chunk text and queries into vectors through an
//! [`Embedder`]. Hosted (Gemini) and local (Ollama) providers are available.

pub mod gemini;
pub mod ollama;

use async_trait::async_trait;

use crate::errors::Result;

pub use gemini::GeminiEmbedder;
pub use ollama::OllamaEmbedder;

/// Converts text into embedding vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed every text, returning one vector per input in the same order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Provider/model label used in logs
    fn name(&self) -> &str;
}
