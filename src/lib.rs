//! IChingSage - I Ching consultations with cost-aware AI interpretation
//!
//! Casts hexagrams with the three-coin method, scores each question's
//! complexity to route it to an economy or premium model, caches accepted
//! interpretations and falls back to a built-in reading whenever the
//! provider fails or answers unacceptably.
//!
//! # Architecture
//!
//! - **hexagram**: line values, King Wen catalog, coin caster
//! - **prompt / interpretation**: prompt building, complexity, routing, validation
//! - **cache / cost**: interpretation cache and spend tracking
//! - **llm / consultation**: provider seam, persistence seam, orchestrator

pub mod errors;
pub mod hexagram;
pub mod prompt;
pub mod interpretation;
pub mod cache;
pub mod cost;
pub mod llm;
pub mod consultation;

// Configuration and command line
pub mod config;
pub mod cli;

// Re-export commonly used types
pub use errors::{ConsultationError, Result};
pub use hexagram::{Hexagram, HexagramCaster, LineValue};
pub use interpretation::{AIInterpretation, InterpretationSource};
pub use consultation::{
    Consultation, ConsultationOrchestrator, ConsultationOutcome, ConsultationRequest,
    ConsultationStore, InMemoryConsultationStore,
};
pub use llm::{LlmClient, LlmResponse, OpenAiClient};
