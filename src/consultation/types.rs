//! Consultation record types
//!
//! `Consultation` is the persisted shape. `NewConsultation` is what the
//! orchestrator hands to the store; the store assigns id, status and
//! timestamps.

use crate::hexagram::{CastingMethod, Hexagram};
use crate::interpretation::{AIInterpretation, InterpretationSource, ModelChoice};
use crate::prompt::PromptStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status. Consultations are archived, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    #[default]
    Active,
    Archived,
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsultationStatus::Active => write!(f, "active"),
            ConsultationStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Request metadata stored with the consultation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationMetadata {
    pub method: CastingMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Filled in by the orchestrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<InterpretationSource>,

    /// Model that produced the interpretation, if one did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ConsultationMetadata {
    pub fn new(method: CastingMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

/// Ephemeral context for a single interpretation attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationContext {
    /// Trimmed, non-empty question
    pub question: String,
    pub hexagram: Hexagram,
    pub timestamp: DateTime<Utc>,
    pub method: CastingMethod,
}

/// Input to `ConsultationOrchestrator::create_consultation`
#[derive(Debug, Clone, Default)]
pub struct ConsultationRequest {
    pub question: String,
    pub user_id: String,

    /// Used as-is when present; otherwise a hexagram is cast
    pub hexagram: Option<Hexagram>,

    pub metadata: Option<ConsultationMetadata>,
}

impl ConsultationRequest {
    pub fn new(question: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_id: user_id.into(),
            hexagram: None,
            metadata: None,
        }
    }

    pub fn with_hexagram(mut self, hexagram: Hexagram) -> Self {
        self.hexagram = Some(hexagram);
        self
    }

    pub fn with_metadata(mut self, metadata: ConsultationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Record handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsultation {
    pub user_id: String,
    pub question: String,
    pub hexagram: Hexagram,
    pub interpretation: AIInterpretation,
    pub metadata: ConsultationMetadata,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Persisted consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: Uuid,
    pub user_id: String,
    pub question: String,
    pub hexagram: Hexagram,
    pub interpretation: AIInterpretation,
    pub metadata: ConsultationMetadata,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Consultation {
    /// Materialize a new record as freshly saved
    pub fn from_new(record: NewConsultation) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            question: record.question,
            hexagram: record.hexagram,
            interpretation: record.interpretation,
            metadata: record.metadata,
            status: ConsultationStatus::Active,
            created_at: now,
            updated_at: now,
            tags: record.tags,
            notes: record.notes,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == ConsultationStatus::Archived
    }
}

/// Everything a caller learns from one consultation
#[derive(Debug, Clone)]
pub struct ConsultationOutcome {
    pub consultation: Consultation,
    pub hexagram: Hexagram,
    pub interpretation: AIInterpretation,
    pub source: InterpretationSource,

    /// Routing decision; on a cache hit no model was called
    pub model: ModelChoice,
    pub complexity: f64,
    pub strategy: PromptStrategy,
    pub cache_key: String,
}
