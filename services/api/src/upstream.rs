//! External collaborators: the matching microservice and the text generator
//!
//! Both are reached over HTTP with no automatic retry. A non-success answer
//! keeps the upstream status and the most specific message found in its body.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::matching::MatchRequest;

pub mod graphrag;
pub mod groq;

/// Failure talking to an upstream service
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The service answered with a non-success status
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection failure or timeout
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but the body was not what we expected
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

/// Recommendation engine that ranks mentors for a skill
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Find mentors; the upstream JSON is returned unmodified
    async fn find_matches(&self, request: &MatchRequest) -> Result<Value, UpstreamError>;
}

/// Prompt sent to the text generator
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError>;
}

/// Extract a human-readable error message from an upstream error body
///
/// Understands FastAPI (`{"detail": "..."}`) and OpenAI-style
/// (`{"error": {"message": "..."}}`) bodies; anything else yields `fallback`.
pub fn error_message(body: &[u8], fallback: &str) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return fallback.to_string();
    };

    let candidates = [
        value.get("detail"),
        value.get("error").and_then(|e| e.get("message")),
        value.get("error"),
        value.get("message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fastapi_detail() {
        assert_eq!(
            error_message(br#"{"detail": "no teachers"}"#, "Failed to find matches"),
            "no teachers"
        );
    }

    #[test]
    fn test_openai_error_message() {
        assert_eq!(
            error_message(
                br#"{"error": {"message": "Invalid API key", "type": "auth"}}"#,
                "fallback"
            ),
            "Invalid API key"
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(error_message(b"<html>502</html>", "fallback"), "fallback");
        assert_eq!(error_message(b"", "fallback"), "fallback");
        // FastAPI validation errors carry a list, not a message
        assert_eq!(
            error_message(br#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#, "fallback"),
            "fallback"
        );
        assert_eq!(error_message(br#"{"detail": "  "}"#, "fallback"), "fallback");
    }
}
