use anyhow::Result;
use std::sync::Arc;

use crate::models::{NewPatient, Patient};
use crate::store::PatientStore;

/// Domain operations over patient records
///
/// Every call is a direct delegation to the underlying store. Store
/// errors are returned unchanged.
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, patient: NewPatient) -> Result<Patient> {
        self.store.insert(patient).await
    }

    pub async fn list(&self) -> Result<Vec<Patient>> {
        self.store.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Patient>> {
        self.store.find_by_id(id).await
    }

    /// Overwrite the record keyed by `patient.id`. Unknown ids are inserted.
    pub async fn update(&self, patient: Patient) -> Result<Patient> {
        self.store.save(patient).await
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.store.delete_by_id(id).await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPatientStore;

    fn service() -> PatientService {
        PatientService::new(Arc::new(InMemoryPatientStore::new()))
    }

    #[tokio::test]
    async fn test_create_returns_stored_record() {
        let service = service();

        let created = service
            .create(NewPatient {
                name: "Olga Lopez".to_string(),
                age: 19,
                email: "o2@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Olga Lopez");
        assert_eq!(created.age, 19);
        assert_eq!(created.email, "o2@example.com");
        assert_eq!(service.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_get_by_id_absent_is_none() {
        assert_eq!(service().get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_upserts_unknown_id() {
        let service = service();
        let patient = Patient {
            id: 7,
            name: "A".to_string(),
            age: 17,
            email: "a@x.com".to_string(),
        };

        service.update(patient.clone()).await.unwrap();

        assert_eq!(service.list().await.unwrap(), vec![patient]);
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_an_error() {
        assert!(service().delete_by_id(5).await.is_ok());
    }
}
