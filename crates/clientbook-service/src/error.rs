use clientbook_core::types::EntityKind;
use thiserror::Error;

use crate::validation::FieldError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("Validation failed: {}", FieldError::join(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("A contact with the email address '{email}' already exists")]
    DuplicateEmail { email: String },

    /// Every sequence number for the prefix is taken. Not retried.
    #[error("Client code space exhausted for prefix '{prefix}'")]
    AllocationExhausted { prefix: String },

    /// Another writer claimed the code between allocation and insert.
    /// Handled inside client creation; never returned to callers.
    #[error("Client code '{code}' was claimed concurrently")]
    ConflictRetryable { code: String },

    #[error("Cannot delete {kind} {id}: it has linked records")]
    DeletionBlocked { kind: EntityKind, id: i32 },

    #[error("Client {client_id} and contact {contact_id} were linked concurrently")]
    LinkConflict { client_id: i32, contact_id: i32 },

    #[error(transparent)]
    DatabaseError(#[from] clientbook_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] clientbook_core::error::CoreError),
}

impl ServiceError {
    #[must_use]
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }

    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationFailed(vec![FieldError::new(field, message)])
    }

    /// ## Summary
    /// Field-level messages for errors the caller can show next to form inputs.
    ///
    /// Returns `None` for errors that are not about a particular field.
    #[must_use]
    pub fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::ValidationFailed(errors) => Some(errors.clone()),
            Self::DuplicateEmail { .. } => Some(vec![FieldError::new(
                "email",
                "A contact with this email address already exists.",
            )]),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
