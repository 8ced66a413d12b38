use salvo::http::StatusCode;
use thiserror::Error;

use clientbook_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] clientbook_core::error::CoreError),
}

impl AppError {
    /// ## Summary
    /// The HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceError(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::ValidationFailed(_) | ServiceError::DuplicateEmail { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ServiceError::DeletionBlocked { .. } | ServiceError::LinkConflict { .. } => {
                    StatusCode::CONFLICT
                }
                ServiceError::AllocationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::ConflictRetryable { .. }
                | ServiceError::DatabaseError(_)
                | ServiceError::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
