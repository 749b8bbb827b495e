use crate::error::{ApiError, ErrorResponse};
use crate::models::{Patient, PatientPayload};
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value as JsonValue;

/// Decode an update body, treating an empty body or JSON `null` as absent
///
/// The body stays untyped here so the id can be checked before the
/// record fields are.
fn parse_body(body: &[u8]) -> Result<Option<JsonValue>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: JsonValue = serde_json::from_slice(body)?;
    Ok((!value.is_null()).then_some(value))
}

/// Integer id carried by the body, if any
fn payload_id(value: &JsonValue) -> Option<i64> {
    value.get("id").and_then(JsonValue::as_i64)
}

/// PUT /api/patients handler - Update an existing patient
///
/// The payload must carry the id of a stored patient. Only `name`, `age`
/// and `email` are copied onto the stored record; its id never changes.
#[utoipa::path(
    put,
    path = routes::PATIENTS,
    request_body = PatientPayload,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Missing patient data or id, or invalid JSON", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "patients"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let value = parse_body(&body)?.ok_or(ApiError::InvalidRequest)?;
    let id = payload_id(&value).ok_or(ApiError::InvalidRequest)?;

    let Some(mut existing) = state.patients.get_by_id(id).await? else {
        tracing::info!("Patient not found with id: {}", id);
        return Err(ApiError::PatientNotFound(id));
    };

    let payload: PatientPayload = serde_json::from_value(value)?;

    existing.name = payload.name;
    existing.age = payload.age;
    existing.email = payload.email;

    let updated = state.patients.update(existing).await?;

    tracing::info!("Successfully updated patient with id: {}", updated.id);
    Ok((StatusCode::OK, Json(updated)))
}
