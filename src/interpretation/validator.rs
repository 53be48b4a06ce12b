//! Interpretation response validator
//!
//! Conjunctive policy. A candidate is accepted only when:
//! 1. `interpretation` (and `guidance`, if present) exceed the minimum length
//! 2. No disallowed fortune-telling vocabulary appears
//! 3. At least one wisdom-oriented signal term appears

use crate::interpretation::types::AIInterpretation;
use std::fmt;

/// Terms that contradict the non-predictive framing (case-insensitive substrings)
pub const DISALLOWED_TERMS: &[&str] = &["predict", "fortune", "guarantee"];

/// Terms that mark wisdom-oriented language
pub const WISDOM_SIGNALS: &[&str] = &[
    "wisdom",
    "guidance",
    "suggests",
    "consider",
    "may",
    "ancient",
    "traditional",
    "reflect",
    "invites",
];

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Minimum trimmed length (chars) for each text section
    pub min_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { min_length: 20 }
    }
}

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    TooShort { field: &'static str, length: usize },
    DisallowedTerm(&'static str),
    MissingWisdomSignal,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::Accepted => write!(f, "accepted"),
            ValidationOutcome::TooShort { field, length } => {
                write!(f, "{} too short ({} chars)", field, length)
            }
            ValidationOutcome::DisallowedTerm(term) => {
                write!(f, "contains disallowed term '{}'", term)
            }
            ValidationOutcome::MissingWisdomSignal => write!(f, "no wisdom-oriented language"),
        }
    }
}

/// Response validator for interpretation quality
#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    config: ValidatorConfig,
}

impl ResponseValidator {
    /// Create new validator with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create validator with custom configuration
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Boolean acceptance
    pub fn is_valid(&self, candidate: &AIInterpretation) -> bool {
        self.check(candidate).is_accepted()
    }

    /// Run every rule, reporting the first failure
    pub fn check(&self, candidate: &AIInterpretation) -> ValidationOutcome {
        // Stage 1: substance
        if let Some(outcome) = self.check_length("interpretation", &candidate.interpretation) {
            return outcome;
        }
        if let Some(guidance) = &candidate.guidance {
            if let Some(outcome) = self.check_length("guidance", guidance) {
                return outcome;
            }
        }

        let text = match &candidate.guidance {
            Some(guidance) => format!("{} {}", candidate.interpretation, guidance),
            None => candidate.interpretation.clone(),
        }
        .to_lowercase();

        // Stage 2: disallowed vocabulary
        if let Some(term) = DISALLOWED_TERMS.iter().find(|term| text.contains(*term)) {
            return ValidationOutcome::DisallowedTerm(*term);
        }

        // Stage 3: wisdom signal
        if !WISDOM_SIGNALS.iter().any(|signal| text.contains(signal)) {
            return ValidationOutcome::MissingWisdomSignal;
        }

        ValidationOutcome::Accepted
    }

    fn check_length(&self, field: &'static str, text: &str) -> Option<ValidationOutcome> {
        let length = text.trim().chars().count();
        if length <= self.config.min_length {
            Some(ValidationOutcome::TooShort { field, length })
        } else {
            None
        }
    }
}
