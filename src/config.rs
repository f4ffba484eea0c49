//! Configuration management for RagBuddy
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.ragbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::embedding::gemini::DEFAULT_EMBEDDING_MODEL;
use crate::embedding::ollama::DEFAULT_OLLAMA_EMBED_MODEL;
use crate::errors::{RagError, Result};
use crate::generation::gemini::DEFAULT_GEMINI_MODEL;
use crate::generation::ollama::DEFAULT_OLLAMA_MODEL;
use crate::ingest::ChunkConfig;
use crate::rag::filter::validate_threshold;
use crate::rag::{PipelineConfig, SearchParams};

/// Complete configuration for RagBuddy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub generator: GeneratorConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub documents: DocumentsConfig,
}

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Ollama,
}

/// Retrieval and relevance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub threshold: f32,
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub provider: Provider,
    /// Model name; the provider's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

/// Embedding model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: Provider,
    /// Model name; the provider's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
}

/// Document corpus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub extensions: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: crate::rag::DEFAULT_TOP_K,
            threshold: crate::rag::DEFAULT_THRESHOLD,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: None,
            api_key_env: "Gemini_API_Key".to_string(),
            base_url: None,
            timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: None,
            base_url: None,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }
}

impl GeneratorConfig {
    /// Configured model, or the default for the selected provider
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, Provider::Gemini) => DEFAULT_GEMINI_MODEL,
            (None, Provider::Ollama) => DEFAULT_OLLAMA_MODEL,
        }
    }
}

impl EmbeddingConfig {
    /// Configured model, or the default for the selected provider
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, Provider::Gemini) => DEFAULT_EMBEDDING_MODEL,
            (None, Provider::Ollama) => DEFAULT_OLLAMA_EMBED_MODEL,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RagError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ragbuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(RagError::Configuration(
                "top_k must be greater than 0".to_string(),
            ));
        }

        validate_threshold(self.retrieval.threshold)?;

        if self.documents.chunk_size == 0 {
            return Err(RagError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.documents.chunk_overlap >= self.documents.chunk_size {
            return Err(RagError::Configuration(
                "chunk_overlap must be less than chunk_size".to_string(),
            ));
        }

        if self.documents.extensions.is_empty() {
            return Err(RagError::Configuration(
                "at least one document extension is required".to_string(),
            ));
        }

        if self.needs_api_key() && self.generator.api_key_env.trim().is_empty() {
            return Err(RagError::Configuration(
                "api_key_env must name an environment variable".to_string(),
            ));
        }

        if self.generator.model_name().trim().is_empty()
            || self.embedding.model_name().trim().is_empty()
        {
            return Err(RagError::Configuration(
                "model names must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RagError::Configuration(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RagError::Configuration(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RagError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// True when any configured provider is the hosted Gemini API
    pub fn needs_api_key(&self) -> bool {
        self.generator.provider == Provider::Gemini || self.embedding.provider == Provider::Gemini
    }

    /// Read the API key from the configured environment variable
    ///
    /// Absence is fatal: the pipeline must not be constructed without it.
    pub fn api_key(&self) -> Result<String> {
        let var = &self.generator.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(RagError::Configuration(format!(
                "API key not found. Please set the '{}' environment variable.",
                var
            ))),
        }
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.generator.timeout_secs.max(1))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Documents directory with tilde expanded
    pub fn documents_dir(&self) -> PathBuf {
        Self::expand_path(&self.documents.dir)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            search: SearchParams {
                top_k: self.retrieval.top_k,
            },
            threshold: self.retrieval.threshold,
        }
    }

    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.documents.chunk_size,
            chunk_overlap: self.documents.chunk_overlap,
        }
    }
}
