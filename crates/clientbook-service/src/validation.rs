//! Field validation for clients and contacts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

pub const NAME_MAX_LEN: usize = 100;
pub const SURNAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;
pub const CLIENT_CODE_LEN: usize = 6;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// A message about one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn join(errors: &[Self]) -> String {
        errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Collects field errors so a form reports all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blank, at most `max` characters.
    pub fn required(&mut self, field: &'static str, label: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{label} is required")));
        } else if value.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{label} must be at most {max} characters"),
            ));
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        self.required(field, "Email", value, EMAIL_MAX_LEN);
        if !value.trim().is_empty() && !is_valid_email(value) {
            self.errors
                .push(FieldError::new(field, "Invalid email format"));
        }
    }

    pub fn exact_len(&mut self, field: &'static str, label: &str, value: &str, len: usize) {
        if value.chars().count() != len {
            self.errors.push(FieldError::new(
                field,
                format!("{label} must be {len} characters"),
            ));
        }
    }

    /// ## Errors
    /// Returns `ServiceError::ValidationFailed` with every collected error.
    pub fn finish(self) -> ServiceResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationFailed(self.errors))
        }
    }
}

/// Syntactic email check. Does not look up the domain.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// ## Summary
/// Validates a client name on its own, as used before a code is allocated.
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` if the name is blank or too long.
pub fn validate_client_name(name: &str) -> ServiceResult<()> {
    let mut v = Validator::new();
    v.required("name", "Client name", name, NAME_MAX_LEN);
    v.finish()
}

/// ## Summary
/// Validates a complete client row.
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` listing every invalid field.
pub fn validate_client(name: &str, email: &str, client_code: &str) -> ServiceResult<()> {
    let mut v = Validator::new();
    v.required("name", "Client name", name, NAME_MAX_LEN);
    v.email("email", email);
    v.exact_len("client_code", "Client code", client_code, CLIENT_CODE_LEN);
    v.finish()
}

/// ## Summary
/// Validates the fields of a contact. Email uniqueness is checked separately
/// against the store.
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` listing every invalid field.
pub fn validate_contact(name: &str, surname: &str, email: &str) -> ServiceResult<()> {
    let mut v = Validator::new();
    v.required("name", "Name", name, NAME_MAX_LEN);
    v.required("surname", "Surname", surname, SURNAME_MAX_LEN);
    v.email("email", email);
    v.finish()
}
