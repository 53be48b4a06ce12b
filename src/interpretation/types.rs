//! Interpretation payloads and model response parsing

use crate::errors::{ConsultationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An interpretation produced by a model or by the fallback generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIInterpretation {
    pub interpretation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practical_advice: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_context: Option<String>,
}

impl AIInterpretation {
    /// Interpretation with no optional sections
    pub fn new(interpretation: impl Into<String>) -> Self {
        Self {
            interpretation: interpretation.into(),
            guidance: None,
            practical_advice: None,
            cultural_context: None,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    pub fn with_practical_advice(mut self, advice: impl Into<String>) -> Self {
        self.practical_advice = Some(advice.into());
        self
    }

    pub fn with_cultural_context(mut self, context: impl Into<String>) -> Self {
        self.cultural_context = Some(context.into());
        self
    }
}

/// Where a consultation's interpretation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationSource {
    Cache,
    Model,
    Fallback,
}

impl fmt::Display for InterpretationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretationSource::Cache => write!(f, "cache"),
            InterpretationSource::Model => write!(f, "model"),
            InterpretationSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Parse raw model output into an interpretation
///
/// Accepts a JSON object, a markdown code fence holding one, or plain prose.
/// Prose around the JSON is ignored: the first fenced block wins, otherwise
/// the span from the first `{` to the last `}`. A JSON candidate that fails
/// to parse, empty output, or an empty `interpretation` is a malformed
/// response.
pub fn parse_model_response(content: &str) -> Result<AIInterpretation> {
    let trimmed = content.trim();
    let body = fenced_block(trimmed).unwrap_or(trimmed);

    if body.is_empty() {
        return Err(ConsultationError::MalformedResponse(
            "empty model response".to_string(),
        ));
    }

    let json = if body.starts_with('{') {
        Some(body)
    } else {
        object_span(body)
    };

    let Some(json) = json else {
        return Ok(AIInterpretation::new(body));
    };

    let parsed: AIInterpretation = serde_json::from_str(json)
        .map_err(|e| ConsultationError::MalformedResponse(e.to_string()))?;

    if parsed.interpretation.trim().is_empty() {
        return Err(ConsultationError::MalformedResponse(
            "interpretation field is empty".to_string(),
        ));
    }
    Ok(parsed)
}

/// Inner text of the first ``` fence, minus its language tag
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    let tag_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let inner = &after[tag_len..];
    // An unterminated fence runs to the end of the reply
    let close = inner.find("```").unwrap_or(inner.len());
    Some(inner[..close].trim())
}

fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
