pub mod health;
pub mod list;
pub mod get;
pub mod create;
pub mod update;
pub mod delete;

pub use health::health_handler;
pub use list::list_handler;
pub use get::get_handler;
pub use create::create_handler;
pub use update::update_handler;
pub use delete::delete_handler;

use crate::error::ApiError;

/// Parse a patient id taken from the request path
pub(crate) fn parse_patient_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidPatientId(raw.to_string()))
}
