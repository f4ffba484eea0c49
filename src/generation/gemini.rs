//! Gemini generation client
//!
//! Endpoint: POST {base}/models/{model}:generateContent?key=API_KEY
//! The system instruction travels in the top-level `system_instruction`
//! field; the query is the single user turn.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Generator, Prompt};
use crate::embedding::gemini::DEFAULT_GEMINI_URL;
use crate::errors::{RagError, Result};

/// Default generation model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";

/// Hosted Gemini generator
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    label: String,
}

impl GeminiGenerator {
    /// Create a generator; a missing credential fails here, not per query
    pub fn new(api_key: String, model: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RagError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_GEMINI_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            api_key,
            label: format!("gemini/{}", model),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(prompt: &'a Prompt) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &prompt.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &prompt.user_content,
                }],
            }],
        }
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, mode = ?prompt.mode, "calling Gemini");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| RagError::Generation(format!("Failed to reach Gemini: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RagError::Generation(format!("Malformed Gemini response: {}", e)))?;

        parsed.text().ok_or_else(|| {
            RagError::Generation("Gemini response contained no text".to_string())
        })
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Map a failed HTTP response to a generation error
///
/// A rejected key arrives as 401/403, or as 400 with reason `API_KEY_INVALID`.
fn error_from_response(status: StatusCode, body: &str) -> RagError {
    let details = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    let key_rejected = details.as_ref().map_or(false, |d| {
        d.details
            .iter()
            .filter_map(|info| info.reason.as_deref())
            .any(|reason| reason.starts_with("API_KEY_"))
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_rejected {
        let message = details.and_then(|d| d.message).unwrap_or_default();
        return RagError::Generation(format!(
            "Gemini authentication failed (HTTP {}): {}",
            status, message
        ));
    }

    RagError::Generation(format!("Gemini returned HTTP {}: {}", status, body))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: Option<String>,
    #[serde(default)]
    details: Vec<ErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorInfo {
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> GeminiGenerator {
        GeminiGenerator::new(
            "secret".to_string(),
            DEFAULT_GEMINI_MODEL,
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_key_is_configuration_error() {
        let err = GeminiGenerator::new(String::new(), DEFAULT_GEMINI_MODEL, None, Duration::from_secs(5))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_generator_label() {
        let gen = generator();
        assert_eq!(gen.name(), "gemini/gemini-2.0-flash-lite");
        assert_eq!(gen.base_url, DEFAULT_GEMINI_URL);
    }

    #[test]
    fn test_request_body_shape() {
        let prompt = Prompt::ungrounded("What is the capital of France?");
        let json = serde_json::to_value(GeminiGenerator::request_body(&prompt)).unwrap();

        assert!(json["system_instruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "What is the capital of France?"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Paris"},{"text":" is the capital."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Paris is the capital."));
    }

    #[test]
    fn test_invalid_key_on_bad_request_is_authentication_failure() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID","domain":"googleapis.com"}]}}"#;

        let err = error_from_response(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, RagError::Generation(_)));
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_other_errors_keep_status_and_body() {
        let err = error_from_response(StatusCode::FORBIDDEN, "");
        assert!(err.to_string().contains("authentication failed"));

        let body = r#"{"error":{"code":400,"message":"Invalid JSON payload","status":"INVALID_ARGUMENT"}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body);
        assert!(!err.to_string().contains("authentication"));
        assert!(err.to_string().contains("Invalid JSON payload"));

        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.text().is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(blocked.text().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generation_error() {
        let gen = GeminiGenerator::new(
            "secret".to_string(),
            DEFAULT_GEMINI_MODEL,
            Some("http://127.0.0.1:1"),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = gen.generate("hello", None).await.unwrap_err();
        assert!(matches!(err, RagError::Generation(_)));
    }
}
