use crate::error::{ApiError, ErrorResponse};
use crate::models::Patient;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /api/patients handler - List every patient
///
/// Records come back in store order (ascending id).
#[utoipa::path(
    get,
    path = routes::PATIENTS,
    responses(
        (status = 200, description = "All patients", body = [Patient]),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "patients"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Patient>>), ApiError> {
    let patients = state.patients.list().await?;

    tracing::info!("Listed {} patients", patients.len());
    Ok((StatusCode::OK, Json(patients)))
}
