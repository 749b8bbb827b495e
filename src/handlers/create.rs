use crate::error::{ApiError, ErrorResponse};
use crate::models::{Patient, PatientPayload};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/patients handler - Store a new patient
///
/// Any `id` in the payload is ignored; the store assigns one.
#[utoipa::path(
    post,
    path = routes::PATIENTS,
    request_body = PatientPayload,
    responses(
        (status = 200, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid JSON", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "patients"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(payload): Json<PatientPayload>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let created = state.patients.create(payload.into()).await?;

    tracing::info!("Successfully created patient with id: {}", created.id);
    Ok((StatusCode::OK, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{decode, patient, send, setup_test_app};
    use crate::store::PatientStore;

    #[tokio::test]
    async fn test_create_endpoint_success() {
        let (app, store) = setup_test_app(&[]).await;

        let payload = serde_json::json!({
            "name": "Olga Lopez",
            "age": 19,
            "email": "o2@gmail.com"
        });

        let (status, body) = send(&app, "POST", "/api/patients", Some(payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let created: Patient = decode(&body);
        assert_eq!(created.name, "Olga Lopez");
        assert_eq!(created.age, 19);
        assert_eq!(created.email, "o2@gmail.com");
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_endpoint_ignores_client_id() {
        let existing = patient(4, "Julen Oliva", 18, "j1@gmail.com");
        let (app, store) = setup_test_app(&[existing.clone()]).await;

        let payload = serde_json::json!({
            "id": 4,
            "name": "Olga Lopez",
            "age": 19,
            "email": "o2@gmail.com"
        });

        let (status, body) = send(&app, "POST", "/api/patients", Some(payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let created: Patient = decode(&body);
        assert_ne!(created.id, 4);
        assert_eq!(store.find_by_id(4).await.unwrap(), Some(existing));
    }

    #[tokio::test]
    async fn test_create_endpoint_invalid_json() {
        let (app, store) = setup_test_app(&[]).await;

        let (status, _) =
            send(&app, "POST", "/api/patients", Some("{invalid json}".to_string())).await;

        // Axum's Json extractor returns 400 for invalid JSON
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
