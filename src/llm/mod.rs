//! LLM provider seam
//!
//! The orchestrator talks to providers only through `LlmClient`, so tests
//! and alternative providers can be swapped in without touching the
//! pipeline.

pub mod client;

use crate::errors::Result;
use async_trait::async_trait;

pub use client::OpenAiClient;

/// Raw provider reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// Message content as returned by the model
    pub content: String,

    /// Total tokens reported by the provider, when available
    pub tokens_used: Option<usize>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tokens_used: None,
        }
    }
}

/// Completion collaborator
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete `prompt` with `model`; may fail on network or provider error
    async fn complete(&self, model: &str, prompt: &str, system_prompt: &str) -> Result<LlmResponse>;
}
