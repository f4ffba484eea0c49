//! Error types for RagBuddy
//!
//! Separates fatal start-up failures from failures of a single query so
//! callers can tell "cannot start" apart from "this query failed".

use thiserror::Error;

/// Main error type for the RagBuddy pipeline and its collaborators
#[derive(Error, Debug)]
pub enum RagError {
    /// Missing credential, unusable index or invalid settings (fatal at construction)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Embedding index unreachable, uninitialised or returned a malformed response
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Language model call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Query rejected before any retrieval ran
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RagError>;

impl RagError {
    /// True for errors that prevent the pipeline from being built at all
    pub fn is_configuration(&self) -> bool {
        matches!(self, RagError::Configuration(_))
    }

    /// True for errors that abort one query but leave the pipeline usable
    pub fn is_per_query(&self) -> bool {
        matches!(
            self,
            RagError::Retrieval(_) | RagError::Generation(_) | RagError::InvalidQuery(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RagError::Configuration("Gemini_API_Key is not set".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Gemini_API_Key"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert!(RagError::Configuration("x".into()).is_configuration());
        assert!(!RagError::Configuration("x".into()).is_per_query());

        assert!(RagError::Retrieval("x".into()).is_per_query());
        assert!(RagError::Generation("x".into()).is_per_query());
        assert!(!RagError::Generation("x".into()).is_configuration());

        let invalid = RagError::InvalidQuery("Query must not be empty".into());
        assert!(invalid.is_per_query());
        assert!(!invalid.is_configuration());
        assert!(invalid.to_string().starts_with("Invalid query"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RagError = io.into();
        assert!(matches!(err, RagError::Io(_)));
        assert!(!err.is_per_query());
    }
}
