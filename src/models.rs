use serde::{Deserialize, Serialize};

/// A stored patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Patient {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub email: String,
}

/// A patient that has not been stored yet and so has no id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub email: String,
}

/// Request body for create and update operations
///
/// `id` is ignored on create and required on update.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PatientPayload {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub email: String,
}

impl From<PatientPayload> for NewPatient {
    fn from(payload: PatientPayload) -> Self {
        NewPatient {
            name: payload.name,
            age: payload.age,
            email: payload.email,
        }
    }
}

impl Patient {
    /// Build a stored record from an unsaved one and its assigned id
    pub fn with_id(id: i64, patient: NewPatient) -> Self {
        Patient {
            id,
            name: patient.name,
            age: patient.age,
            email: patient.email,
        }
    }
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Configured store backend, `spanner` or `memory`
    pub store: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub store: String,
    pub error: String,
}
