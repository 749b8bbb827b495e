use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message returned when an update arrives without a body or without an id
pub const PATIENT_DATA_REQUIRED: &str = "patient data must not be null";

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Every handler failure is classified into one of these variants, which
/// map to an HTTP status code and a JSON `{"error": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    /// Update payload absent or missing its id
    InvalidRequest,
    /// No patient stored under this id
    PatientNotFound(i64),
    /// Path parameter is not an integer id
    InvalidPatientId(String),
    /// Store operation error
    DatabaseError(anyhow::Error),
    /// JSON parsing error
    JsonError(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest
            | ApiError::InvalidPatientId(_)
            | ApiError::JsonError(_) => StatusCode::BAD_REQUEST,
            ApiError::PatientNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest => PATIENT_DATA_REQUIRED.to_string(),
            ApiError::PatientNotFound(id) => format!("patient with id {} does not exist", id),
            ApiError::InvalidPatientId(raw) => {
                format!("Invalid patient id: expected an integer, got '{}'", raw)
            }
            ApiError::DatabaseError(err) => format!("Database error: {}", err),
            ApiError::JsonError(err) => format!("JSON parse error: {}", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::DatabaseError(err) = &self {
            tracing::error!("Store operation failed: {:#}", err);
        }

        let body = Json(ErrorResponse {
            error: self.message(),
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err)
    }
}
