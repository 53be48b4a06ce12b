//! Prompt construction for hexagram interpretation
//!
//! Two variants share the same required anchors (`Hexagram {n}: {name}`, the
//! question, `changing lines: ...`) and the same tone instructions:
//!
//! - **Compressed**: anchors plus one instruction paragraph, used for simple
//!   questions on the economy tier
//! - **Standard**: adds trigram imagery, the relating hexagram and a numbered
//!   structure for the premium tier
//!
//! For representative inputs the compressed prompt costs 40-80% of the
//! standard prompt's estimated tokens.

use crate::hexagram::Hexagram;
use crate::prompt::counter::estimate_tokens;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Questions longer than this (in chars) are truncated before embedding
pub const MAX_QUESTION_CHARS: usize = 300;

/// Appended to a truncated question
pub const ELLIPSIS: &str = "...";

/// System prompt sent alongside either variant
pub const SYSTEM_PROMPT: &str = "You are a thoughtful interpreter of the I Ching, the classical Chinese Book of Changes. \
Speak with respect for its cultural and philosophical heritage. Offer reflective wisdom and guidance, \
never predictions, promises or claims of certainty about the future.";

/// Which prompt variant to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStrategy {
    Compressed,
    Standard,
}

impl PromptStrategy {
    /// Compressed below the threshold, standard at or above it
    pub fn for_complexity(complexity: f64, threshold: f64) -> Self {
        if complexity < threshold {
            PromptStrategy::Compressed
        } else {
            PromptStrategy::Standard
        }
    }
}

impl fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStrategy::Compressed => write!(f, "compressed"),
            PromptStrategy::Standard => write!(f, "standard"),
        }
    }
}

/// Builds interpretation prompts
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the variant selected by `strategy`
    pub fn build(&self, strategy: PromptStrategy, hexagram: &Hexagram, question: &str) -> String {
        match strategy {
            PromptStrategy::Compressed => self.build_compressed(hexagram, question),
            PromptStrategy::Standard => self.build_standard(hexagram, question),
        }
    }

    /// Short prompt for simple questions
    pub fn build_compressed(&self, hexagram: &Hexagram, question: &str) -> String {
        format!(
            "I Ching consultation.\n\
             {header}{changing}\n\
             Question: \"{question}\"\n\
             \n\
             Offer a rich, meaningful interpretation in respectful, culturally authentic language. \
             Draw on the traditional imagery, frame insight as wisdom for reflection rather than certainty, \
             and close with practical guidance. \
             Reply as JSON with keys interpretation, guidance, practicalAdvice, culturalContext.",
            header = hexagram,
            changing = changing_line(hexagram),
            question = truncate_question(question),
        )
    }

    /// Full prompt with trigram imagery and the relating hexagram
    pub fn build_standard(&self, hexagram: &Hexagram, question: &str) -> String {
        let lower = hexagram.lower_trigram();
        let upper = hexagram.upper_trigram();
        let relating = hexagram
            .relating()
            .map(|r| format!("\nRelating hexagram: {}", r))
            .unwrap_or_default();

        format!(
            "You are consulting the I Ching on behalf of a sincere seeker.\n\
             \n\
             {header}\n\
             Trigrams: {lower_name} ({lower_image}) below, {upper_name} ({upper_image}) above{changing}{relating}\n\
             Question: \"{question}\"\n\
             \n\
             Please provide a rich, meaningful interpretation that:\n\
             1. Explains the hexagram's core meaning and the image of its trigrams\n\
             2. Relates that meaning thoughtfully to the question\n\
             3. Addresses any changing lines and the relating hexagram\n\
             4. Offers practical guidance for reflection\n\
             5. Notes relevant cultural and historical context\n\
             \n\
             Use respectful, culturally authentic language that honors the tradition. \
             Present insight as wisdom, never as certainty about the future.\n\
             \n\
             Reply as JSON with the keys \"interpretation\", \"guidance\", \"practicalAdvice\" and \"culturalContext\".",
            header = hexagram,
            lower_name = lower.name(),
            lower_image = lower.image(),
            upper_name = upper.name(),
            upper_image = upper.image(),
            changing = changing_line(hexagram),
            relating = relating,
            question = truncate_question(question),
        )
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// Token estimate of the compressed prompt relative to the standard one
    pub fn compression_ratio(&self, hexagram: &Hexagram, question: &str) -> f64 {
        let compressed = estimate_tokens(&self.build_compressed(hexagram, question));
        let standard = estimate_tokens(&self.build_standard(hexagram, question));
        compressed as f64 / standard.max(1) as f64
    }
}

fn changing_line(hexagram: &Hexagram) -> String {
    if hexagram.has_changing_lines() {
        format!("\nchanging lines: {}", hexagram.changing_lines_label())
    } else {
        String::new()
    }
}

/// Trim the question and cap it at `MAX_QUESTION_CHARS`, marking any cut
pub fn truncate_question(question: &str) -> String {
    let trimmed = question.trim();
    if trimmed.chars().count() <= MAX_QUESTION_CHARS {
        return trimmed.to_string();
    }

    let head: String = trimmed.chars().take(MAX_QUESTION_CHARS).collect();
    format!("{}{}", head.trim_end(), ELLIPSIS)
}
