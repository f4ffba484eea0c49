//! Bootstrap for RagBuddy
//!
//! Wires configuration into a ready pipeline: credential check, embedder,
//! index population from the document directory, then the generator.
//! Every failure here is fatal and reported as a configuration error.

use std::sync::Arc;
use tracing::info;

use crate::config::{Config, Provider};
use crate::embedding::{Embedder, GeminiEmbedder, OllamaEmbedder};
use crate::errors::{RagError, Result};
use crate::generation::{GeminiGenerator, Generator, OllamaGenerator};
use crate::index::{EmbeddingIndex, InMemoryIndex};
use crate::ingest::{Chunker, DocumentLoader};
use crate::rag::RagPipeline;

/// Builds a [`RagPipeline`] from configuration
pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Construct every collaborator and populate the index
    pub async fn build(&self) -> Result<RagPipeline> {
        self.config.validate()?;

        // Fail on a missing credential before doing any work
        let api_key = if self.config.needs_api_key() {
            Some(self.config.api_key()?)
        } else {
            None
        };

        let embedder = self.build_embedder(api_key.as_deref())?;
        let generator = self.build_generator(api_key.as_deref())?;

        let index: Arc<dyn EmbeddingIndex> = Arc::new(InMemoryIndex::new(embedder));
        let loader = DocumentLoader::new(self.config.documents_dir(), &self.config.documents.extensions);
        let chunker = Chunker::new(self.config.chunk_config());
        let added = populate_index(index.as_ref(), &loader, &chunker).await?;

        info!(
            chunks = added,
            generator = generator.name(),
            threshold = self.config.retrieval.threshold,
            top_k = self.config.retrieval.top_k,
            "pipeline ready"
        );

        Ok(RagPipeline::with_config(
            index,
            generator,
            self.config.pipeline_config(),
        ))
    }

    /// Embedding provider named in the configuration
    pub fn build_embedder(&self, api_key: Option<&str>) -> Result<Arc<dyn Embedder>> {
        let cfg = &self.config.embedding;
        let embedder: Arc<dyn Embedder> = match cfg.provider {
            Provider::Gemini => Arc::new(GeminiEmbedder::new(
                require_key(api_key)?,
                cfg.model_name(),
                cfg.base_url.as_deref(),
            )?),
            Provider::Ollama => {
                let base = cfg.base_url.clone().unwrap_or_else(|| self.config.ollama_url());
                Arc::new(OllamaEmbedder::new(&base, cfg.model_name())?)
            }
        };
        Ok(embedder)
    }

    /// Generator named in the configuration
    pub fn build_generator(&self, api_key: Option<&str>) -> Result<Arc<dyn Generator>> {
        let cfg = &self.config.generator;
        let timeout = self.config.generator_timeout();
        let generator: Arc<dyn Generator> = match cfg.provider {
            Provider::Gemini => Arc::new(GeminiGenerator::new(
                require_key(api_key)?,
                cfg.model_name(),
                cfg.base_url.as_deref(),
                timeout,
            )?),
            Provider::Ollama => {
                let base = cfg.base_url.clone().unwrap_or_else(|| self.config.ollama_url());
                Arc::new(OllamaGenerator::with_config(&base, cfg.model_name(), timeout)?)
            }
        };
        Ok(generator)
    }
}

/// Build a pipeline straight from configuration
pub async fn build_pipeline(config: &Config) -> Result<RagPipeline> {
    Bootstrap::new(config.clone()).build().await
}

/// Reset the index and fill it with chunks of every loaded document
///
/// Returns the number of chunks stored. Running it again on the same
/// index yields the same contents.
pub async fn populate_index(
    index: &dyn EmbeddingIndex,
    loader: &DocumentLoader,
    chunker: &Chunker,
) -> Result<usize> {
    let documents = loader.load_documents().map_err(|e| match e {
        RagError::Configuration(_) => e,
        other => RagError::Configuration(format!("Failed to load documents: {}", other)),
    })?;
    let chunks = chunker.chunk_documents(&documents);
    let count = chunks.len();

    index.reset().await?;
    index.add(chunks).await.map_err(|e| match e {
        RagError::Configuration(_) => e,
        other => RagError::Configuration(format!("Failed to populate index: {}", other)),
    })?;

    info!(documents = documents.len(), chunks = count, root = %loader.root().display(), "index populated");
    Ok(count)
}

fn require_key(api_key: Option<&str>) -> Result<String> {
    api_key
        .map(str::to_string)
        .ok_or_else(|| RagError::Configuration("Gemini provider requires an API key".to_string()))
}
