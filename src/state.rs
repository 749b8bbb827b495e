use crate::config::Config;
use crate::service::PatientService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub patients: PatientService,
    pub config: Arc<Config>,
}
