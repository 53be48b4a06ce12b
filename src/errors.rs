//! Error types for IChingSage
//!
//! Input validation and persistence failures reach the caller. Provider
//! failures (`LlmError`, `Timeout`, `MalformedResponse`) are recovered inside
//! the orchestrator and only ever appear in logs.

use thiserror::Error;

/// Main error type for the consultation pipeline
#[derive(Error, Debug)]
pub enum ConsultationError {
    /// Question was empty or whitespace-only
    #[error("Question cannot be empty")]
    EmptyQuestion,

    /// User id was empty or whitespace-only
    #[error("User ID is required")]
    MissingUserId,

    /// Caller-supplied hexagram violates a structural invariant
    #[error("Invalid hexagram: {0}")]
    InvalidHexagram(String),

    /// Catalog lookup outside 1..=64
    #[error("Hexagram number {number} is out of range (1-64)")]
    HexagramOutOfRange { number: u32 },

    /// Line value outside {6, 7, 8, 9}
    #[error("Line value {value} is invalid (expected 6, 7, 8 or 9)")]
    LineValueOutOfRange { value: u8 },

    /// LLM provider errors
    #[error("LLM provider error: {0}")]
    LlmError(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Provider answered but the content was unusable
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Raised by a persistence collaborator
    #[error("{0}")]
    Storage(String),

    /// Persistence failure while creating a consultation
    #[error("Consultation creation failed: {0}")]
    CreationFailed(String),

    /// State machine transition errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ConsultationError {
    /// True for failures the orchestrator absorbs with a fallback interpretation
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConsultationError::LlmError(_)
                | ConsultationError::Timeout { .. }
                | ConsultationError::MalformedResponse(_)
                | ConsultationError::HttpError(_)
                | ConsultationError::SerializationError(_)
        )
    }
}

/// Result type alias for consultation operations
pub type Result<T> = std::result::Result<T, ConsultationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            ConsultationError::EmptyQuestion.to_string(),
            "Question cannot be empty"
        );
        assert_eq!(
            ConsultationError::MissingUserId.to_string(),
            "User ID is required"
        );
    }

    #[test]
    fn test_creation_failed_wraps_original_message() {
        let original = ConsultationError::Storage("disk full".to_string());
        let err = ConsultationError::CreationFailed(original.to_string());
        assert_eq!(err.to_string(), "Consultation creation failed: disk full");
    }

    #[test]
    fn test_range_error_display() {
        let err = ConsultationError::HexagramOutOfRange { number: 65 };
        assert!(err.to_string().contains("65"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ConsultationError::LlmError("503".to_string()).is_recoverable());
        assert!(ConsultationError::Timeout { duration_ms: 12_000 }.is_recoverable());
        assert!(!ConsultationError::EmptyQuestion.is_recoverable());
        assert!(!ConsultationError::Storage("down".to_string()).is_recoverable());
    }

    #[test]
    fn test_serde_json_error_converts() {
        let err: ConsultationError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConsultationError::SerializationError(_)));
        assert!(err.is_recoverable());
    }
}
