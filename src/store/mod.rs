pub mod memory;
pub mod spanner;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewPatient, Patient};

pub use memory::InMemoryPatientStore;
pub use spanner::SpannerPatientStore;

/// Persistence backend for patient records
///
/// `insert` and `save` together give insert-or-update by primary key:
/// `insert` assigns a fresh id, `save` writes under the record's own id
/// whether or not that id already exists.
#[async_trait]
pub trait PatientStore: Send + Sync + 'static {
    /// Store a new record under a freshly assigned id
    async fn insert(&self, patient: NewPatient) -> Result<Patient>;

    /// Insert or overwrite the record keyed by `patient.id`
    async fn save(&self, patient: Patient) -> Result<Patient>;

    /// All records in ascending id order
    async fn find_all(&self) -> Result<Vec<Patient>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>>;

    /// Remove the record if present. Absent ids are not an error.
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
