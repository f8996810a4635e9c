//! HTTP client for an OpenAI-compatible chat completion API (Groq)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::{Prompt, TextGenerator, UpstreamError, error_message};

const COMPLETION_FALLBACK: &str = "Failed to get recommendation";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice; empty when the model returned nothing
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

/// Groq client
#[derive(Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    /// Create a new client
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> anyhow::Result<Self> {
        if api_key.is_empty() {
            warn!("GROQ_API_KEY is not set; AI recommendations will fail");
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn chat_request<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.chat_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            let message = error_message(&body, COMPLETION_FALLBACK);
            warn!("Text generation service returned {}: {}", status, message);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let completion = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        Ok(completion.into_text())
    }
}
