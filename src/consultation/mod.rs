//! Consultation pipeline
//!
//! The orchestrator drives a request through casting, routing, caching,
//! interpretation and persistence. The store trait is its persistence seam.

pub mod orchestrator;
pub mod state;
pub mod store;
pub mod types;

pub use orchestrator::{ConsultationOrchestrator, OrchestratorConfig};
pub use state::ConsultationState;
pub use store::{ConsultationStore, InMemoryConsultationStore};
pub use types::{
    Consultation, ConsultationContext, ConsultationMetadata, ConsultationOutcome,
    ConsultationRequest, ConsultationStatus, NewConsultation,
};
