use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    /// A unique index rejected a write. `constraint` names the index.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key rejected a write. `constraint` names the key.
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error(transparent)]
    CoreError(#[from] clientbook_core::error::CoreError),
}

impl DbError {
    /// Whether this error is a unique-index rejection of `constraint`.
    #[must_use]
    pub fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: name } if name == constraint)
    }
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().unwrap_or_default().to_string(),
                }
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().unwrap_or_default().to_string(),
                }
            }
            other => Self::DatabaseError(other),
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
