use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PatientStore;
use crate::models::{NewPatient, Patient};

#[derive(Default)]
struct Inner {
    records: BTreeMap<i64, Patient>,
    last_id: i64,
}

/// Process-local patient store
///
/// Ids are assigned from a monotonically increasing counter, so an id is
/// never reused after its record is deleted.
#[derive(Default)]
pub struct InMemoryPatientStore {
    inner: RwLock<Inner>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let stored = Patient::with_id(inner.last_id, patient);
        inner.records.insert(stored.id, stored.clone());

        tracing::debug!("Inserted patient with id: {}", stored.id);
        Ok(stored)
    }

    async fn save(&self, patient: Patient) -> Result<Patient> {
        let mut inner = self.inner.write().await;
        inner.last_id = inner.last_id.max(patient.id);
        inner.records.insert(patient.id, patient.clone());

        tracing::debug!("Saved patient with id: {}", patient.id);
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.records.remove(&id).is_some() {
            tracing::debug!("Deleted patient with id: {}", id);
        }
        Ok(())
    }
}
