//! Token estimation for prompt sizing and cost accounting
//!
//! # Algorithm
//!
//! Base estimate: 1 token ≈ 4 characters
//!
//! ```text
//! estimate_tokens(text) = ⌈chars(text) / 4⌉
//! ```
//!
//! Deterministic and monotonic in text length. Not tied to any real tokenizer.

/// Estimate token count for text
pub fn estimate_tokens(text: &str) -> usize {
    TokenCounter::new().estimate(text)
}

/// Character-based token estimator
#[derive(Debug, Clone, Default)]
pub struct TokenCounter;

impl TokenCounter {
    /// Create new token counter
    pub fn new() -> Self {
        Self
    }

    /// Estimate token count for text
    ///
    /// # Examples
    ///
    /// ```
    /// # use ichingsage::prompt::counter::TokenCounter;
    /// let counter = TokenCounter::new();
    /// assert_eq!(counter.estimate(&"a".repeat(100)), 25);
    /// assert_eq!(counter.estimate("abcde"), 2);
    /// ```
    pub fn estimate(&self, text: &str) -> usize {
        let char_count = text.chars().count();

        // Round up
        (char_count + 3) / 4
    }

    /// Sum of estimates over several segments
    pub fn estimate_batch(&self, texts: &[&str]) -> usize {
        texts.iter().map(|text| self.estimate(text)).sum()
    }
}
