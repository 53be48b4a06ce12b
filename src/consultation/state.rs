//! Consultation state machine
//!
//! One pass through the pipeline per consultation. Every step is a checked
//! transition, so an out-of-order call is an `InvalidTransition` error rather
//! than a silently skipped stage.
//!
//! ```text
//! Idle → Validating → (Casting | UsingSuppliedHexagram) → ScoringComplexity
//!      → SelectingModel → BuildingPrompt → CheckingCache
//!      → CacheHit → Persisting
//!      → CallingModel → ValidatingResponse → RecordingCost → Persisting
//!                                          ↘ RecordingCost → FallbackInterpretation
//!                     → FallbackInterpretation → Persisting
//! Persisting → Done
//! ```
//!
//! `Failed` is reachable from any non-terminal state. `Done` and `Failed`
//! return to `Idle` for the next consultation.

use crate::errors::{ConsultationError, Result};
use serde::{Deserialize, Serialize};

/// Pipeline states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsultationState {
    #[default]
    Idle,
    Validating,
    Casting,
    UsingSuppliedHexagram,
    ScoringComplexity,
    SelectingModel,
    BuildingPrompt,
    CheckingCache,
    CacheHit,
    CallingModel,
    ValidatingResponse,
    RecordingCost,
    FallbackInterpretation,
    Persisting,

    /// Consultation persisted (terminal)
    Done,

    /// Input or persistence failure (terminal)
    Failed,
}

impl ConsultationState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConsultationState::Done | ConsultationState::Failed)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ConsultationState) -> bool {
        use ConsultationState::*;

        if next == Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Casting)
                | (Validating, UsingSuppliedHexagram)
                | (Casting, ScoringComplexity)
                | (UsingSuppliedHexagram, ScoringComplexity)
                | (ScoringComplexity, SelectingModel)
                | (SelectingModel, BuildingPrompt)
                | (BuildingPrompt, CheckingCache)
                | (CheckingCache, CacheHit)
                | (CheckingCache, CallingModel)
                | (CacheHit, Persisting)
                | (CallingModel, ValidatingResponse)
                | (CallingModel, FallbackInterpretation)
                | (ValidatingResponse, RecordingCost)
                | (ValidatingResponse, FallbackInterpretation)
                | (RecordingCost, Persisting)
                | (RecordingCost, FallbackInterpretation)
                | (FallbackInterpretation, Persisting)
                | (Persisting, Done)
                | (Done, Idle)
                | (Failed, Idle)
        )
    }

    /// Attempt state transition with validation
    pub fn transition(&self, next: ConsultationState) -> Result<ConsultationState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ConsultationError::InvalidTransition {
                from: format!("{:?}", self),
                to: format!("{:?}", next),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConsultationState::*;

    fn walk(path: &[ConsultationState]) -> Result<ConsultationState> {
        let mut state = Idle;
        for next in path {
            state = state.transition(*next)?;
        }
        Ok(state)
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(ConsultationState::default(), Idle);
    }

    #[test]
    fn test_model_path() {
        let end = walk(&[
            Validating,
            Casting,
            ScoringComplexity,
            SelectingModel,
            BuildingPrompt,
            CheckingCache,
            CallingModel,
            ValidatingResponse,
            RecordingCost,
            Persisting,
            Done,
        ]);
        assert_eq!(end.unwrap(), Done);
    }

    #[test]
    fn test_cache_hit_path() {
        let end = walk(&[
            Validating,
            UsingSuppliedHexagram,
            ScoringComplexity,
            SelectingModel,
            BuildingPrompt,
            CheckingCache,
            CacheHit,
            Persisting,
            Done,
        ]);
        assert_eq!(end.unwrap(), Done);
    }

    #[test]
    fn test_fallback_paths() {
        let prefix = [
            Validating,
            Casting,
            ScoringComplexity,
            SelectingModel,
            BuildingPrompt,
            CheckingCache,
            CallingModel,
        ];

        // Provider failure
        let mut call_failed = prefix.to_vec();
        call_failed.extend([FallbackInterpretation, Persisting, Done]);
        assert_eq!(walk(&call_failed).unwrap(), Done);

        // Rejected response, cost still recorded
        let mut rejected = prefix.to_vec();
        rejected.extend([ValidatingResponse, RecordingCost, FallbackInterpretation, Persisting, Done]);
        assert_eq!(walk(&rejected).unwrap(), Done);
    }

    #[test]
    fn test_cache_hit_cannot_record_cost() {
        assert!(CacheHit.transition(RecordingCost).is_err());
    }

    #[test]
    fn test_cannot_skip_validation() {
        assert!(Idle.transition(Casting).is_err());
        assert!(Idle.transition(CallingModel).is_err());
    }

    #[test]
    fn test_failure_from_any_active_state() {
        for state in [Validating, Casting, CheckingCache, CallingModel, Persisting] {
            assert_eq!(state.transition(Failed).unwrap(), Failed);
        }
        assert!(Done.transition(Failed).is_err());
    }

    #[test]
    fn test_terminal_states_reset_to_idle() {
        assert!(Done.is_terminal());
        assert!(Failed.is_terminal());
        assert_eq!(Done.transition(Idle).unwrap(), Idle);
        assert_eq!(Failed.transition(Idle).unwrap(), Idle);
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = Persisting.transition(CallingModel).unwrap_err();
        assert!(err.to_string().contains("Persisting"));
        assert!(err.to_string().contains("CallingModel"));
    }
}
