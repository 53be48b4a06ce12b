//! Prompt construction and token estimation

pub mod builder;
pub mod counter;

// Re-export commonly used types
pub use builder::{truncate_question, PromptBuilder, PromptStrategy, MAX_QUESTION_CHARS, SYSTEM_PROMPT};
pub use counter::{estimate_tokens, TokenCounter};
