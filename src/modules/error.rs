//! Domain failures raised by the services.

use library_http::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist (surfaced as 400).
    #[error("{field} not found")]
    ReferenceNotFound { field: &'static str },

    /// A uniqueness rule was violated (surfaced as 409).
    #[error("{0}")]
    Conflict(&'static str),

    /// The requested entity does not exist (surfaced as 404).
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ReferenceNotFound { .. } => AppError::bad_request(err.to_string()),
            ServiceError::Conflict(message) => AppError::conflict(message),
            ServiceError::NotFound { .. } => AppError::not_found(err.to_string()),
            ServiceError::Store(source) => AppError::Database(source),
        }
    }
}
