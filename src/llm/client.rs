//! Chat-completion client for OpenAI-compatible providers
//!
//! Endpoint: POST {base_url}/chat/completions
//!
//! Only the fields the consultation pipeline needs are modelled: the first
//! choice's message content and the reported token usage.

use crate::errors::{ConsultationError, Result};
use crate::llm::{LlmClient, LlmResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Request timeout at the HTTP layer. The orchestrator enforces its own,
/// tighter deadline on top of this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for chat completions
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Create client against the default endpoint
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, api_key)
    }

    /// Create client with custom endpoint
    pub fn with_config(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ConsultationError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, model: &str, prompt: &str, system_prompt: &str) -> Result<LlmResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ConsultationError::LlmError("API key not configured".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
        };

        debug!(model, url = %url, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConsultationError::LlmError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ConsultationError::LlmError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ConsultationError::MalformedResponse(e.to_string()))?;

        body.into_llm_response()
    }
}

/// Request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: usize,
}

impl ChatResponse {
    fn into_llm_response(self) -> Result<LlmResponse> {
        let tokens_used = self.usage.map(|u| u.total_tokens);
        let content = self
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ConsultationError::MalformedResponse("no choices returned".to_string()))?;

        Ok(LlmResponse {
            content,
            tokens_used,
        })
    }
}
