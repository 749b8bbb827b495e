use crate::error::{ApiError, ErrorResponse};
use crate::handlers::parse_patient_id;
use crate::models::Patient;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /api/patients/:id handler - Retrieve a single patient
#[utoipa::path(
    get,
    path = routes::PATIENT_ITEM,
    params(
        ("id" = i64, Path, description = "Patient id")
    ),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 400, description = "Invalid patient id", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "patients"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let id = parse_patient_id(&id_str)?;

    match state.patients.get_by_id(id).await? {
        Some(patient) => {
            tracing::info!("Successfully retrieved patient with id: {}", id);
            Ok((StatusCode::OK, Json(patient)))
        }
        None => {
            tracing::info!("Patient not found with id: {}", id);
            Err(ApiError::PatientNotFound(id))
        }
    }
}
