//! AI interpretation subsystem
//!
//! Complexity scoring, model routing, response parsing and validation, and
//! the deterministic fallback used when the provider cannot be trusted.

pub mod complexity;
pub mod fallback;
pub mod selector;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use complexity::ComplexityScorer;
pub use fallback::FallbackGenerator;
pub use selector::{ModelChoice, ModelSelector, ModelTier};
pub use types::{parse_model_response, AIInterpretation, InterpretationSource};
pub use validator::{ResponseValidator, ValidationOutcome, ValidatorConfig};
