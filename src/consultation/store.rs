//! Persistence collaborator
//!
//! The pipeline writes through `ConsultationStore::save`. Read and update
//! operations exist for callers of the library; consultations are archived,
//! never deleted.

use crate::consultation::types::{Consultation, ConsultationStatus, NewConsultation};
use crate::errors::{ConsultationError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage backend for consultations
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Persist a new consultation
    async fn save(&self, record: NewConsultation) -> Result<Consultation>;

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Consultation>>;

    /// A user's consultations, newest first
    async fn fetch_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Consultation>>;

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> Result<Consultation>;

    async fn update_tags(&self, id: Uuid, tags: Vec<String>) -> Result<Consultation>;

    /// Soft delete
    async fn archive(&self, id: Uuid) -> Result<Consultation>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryConsultationStore {
    records: RwLock<HashMap<Uuid, Consultation>>,
}

impl InMemoryConsultationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn modify<F>(&self, id: Uuid, apply: F) -> Result<Consultation>
    where
        F: FnOnce(&mut Consultation) + Send,
    {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| ConsultationError::Storage(format!("Consultation {} not found", id)))?;

        apply(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[async_trait]
impl ConsultationStore for InMemoryConsultationStore {
    async fn save(&self, record: NewConsultation) -> Result<Consultation> {
        let consultation = Consultation::from_new(record);
        self.records
            .write()
            .await
            .insert(consultation.id, consultation.clone());
        Ok(consultation)
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Consultation>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn fetch_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Consultation>> {
        let records = self.records.read().await;
        let mut matching: Vec<Consultation> = records
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> Result<Consultation> {
        self.modify(id, move |c| c.notes = notes).await
    }

    async fn update_tags(&self, id: Uuid, tags: Vec<String>) -> Result<Consultation> {
        self.modify(id, move |c| c.tags = tags).await
    }

    async fn archive(&self, id: Uuid) -> Result<Consultation> {
        self.modify(id, |c| c.status = ConsultationStatus::Archived)
            .await
    }
}
