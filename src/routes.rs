// Route path constants - single source of truth for all API paths

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const PATIENTS: &str = "/api/patients";
pub const PATIENT_ITEM: &str = "/api/patients/{id}";

pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the application router with all patient routes and API docs
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            PATIENTS,
            get(handlers::list_handler)
                .post(handlers::create_handler)
                .put(handlers::update_handler),
        )
        .route(
            PATIENT_ITEM,
            get(handlers::get_handler).delete(handlers::delete_handler),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
