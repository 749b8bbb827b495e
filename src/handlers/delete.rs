use crate::error::{ApiError, ErrorResponse};
use crate::handlers::parse_patient_id;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /api/patients/:id handler - Remove a patient
///
/// Deleting an id that is not stored is a 404, so a repeated delete of
/// the same id fails the second time.
#[utoipa::path(
    delete,
    path = routes::PATIENT_ITEM,
    params(
        ("id" = i64, Path, description = "Patient id")
    ),
    responses(
        (status = 200, description = "Patient deleted"),
        (status = 400, description = "Invalid patient id", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "patients"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_patient_id(&id_str)?;

    if state.patients.get_by_id(id).await?.is_none() {
        tracing::info!("Patient not found with id: {}", id);
        return Err(ApiError::PatientNotFound(id));
    }

    state.patients.delete_by_id(id).await?;

    tracing::info!("Successfully deleted patient with id: {}", id);
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{decode, patient, send, setup_test_app};
    use crate::store::PatientStore;

    #[tokio::test]
    async fn test_delete_endpoint_success() {
        let (app, _) = setup_test_app(&[
            patient(1, "Christian Ramirez", 17, "c1@gmail.com"),
            patient(2, "Julen Oliva", 18, "j1@gmail.com"),
        ])
        .await;

        let (status, body) = send(&app, "DELETE", "/api/patients/2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, _) = send(&app, "GET", "/api/patients/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_endpoint_not_found() {
        let stored = patient(2, "Julen Oliva", 18, "j1@gmail.com");
        let (app, store) = setup_test_app(&[stored.clone()]).await;

        let (status, body) = send(&app, "DELETE", "/api/patients/10", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error_response: ErrorResponse = decode(&body);
        assert_eq!(error_response.error, "patient with id 10 does not exist");
        assert_eq!(store.find_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_delete_endpoint_twice() {
        let (app, _) = setup_test_app(&[patient(2, "Julen Oliva", 18, "j1@gmail.com")]).await;

        let (first, _) = send(&app, "DELETE", "/api/patients/2", None).await;
        let (second, body) = send(&app, "DELETE", "/api/patients/2", None).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::NOT_FOUND);
        let error_response: ErrorResponse = decode(&body);
        assert_eq!(error_response.error, "patient with id 2 does not exist");
    }

    #[tokio::test]
    async fn test_delete_endpoint_invalid_id() {
        let (app, _) = setup_test_app(&[]).await;

        let (status, _) = send(&app, "DELETE", "/api/patients/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
