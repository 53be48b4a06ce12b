//! Interpretation caching
//!
//! Cache hits skip the provider call entirely and are never billed.

pub mod key;
pub mod store;

// Re-export commonly used types
pub use key::{normalize_question, CacheKeyGenerator};
pub use store::{CacheStats, InterpretationCache};
