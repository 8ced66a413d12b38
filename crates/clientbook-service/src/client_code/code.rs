use std::fmt;

use crate::error::{ServiceError, ServiceResult};

use super::prefix::Prefix;

/// Largest sequence number a prefix can hold.
pub const MAX_SEQUENCE: u16 = 999;
pub const SEQUENCE_DIGITS: usize = 3;

/// A complete `PPPNNN` client code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientCode {
    code: String,
    sequence: u16,
}

impl ClientCode {
    /// ## Summary
    /// Builds the code for `sequence` within `prefix`.
    ///
    /// ## Errors
    /// Returns `ServiceError::AllocationExhausted` if `sequence` exceeds
    /// [`MAX_SEQUENCE`].
    pub fn new(prefix: &Prefix, sequence: u16) -> ServiceResult<Self> {
        if sequence > MAX_SEQUENCE {
            return Err(ServiceError::AllocationExhausted {
                prefix: prefix.to_string(),
            });
        }
        Ok(Self {
            code: format!("{prefix}{sequence:03}"),
            sequence,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }
}

/// ## Summary
/// Reads the numeric tail of a stored code.
///
/// Returns `None` unless the last three characters are ASCII digits.
#[must_use]
pub fn trailing_sequence(code: &str) -> Option<u16> {
    let chars: Vec<char> = code.chars().collect();
    let tail = chars.get(chars.len().checked_sub(SEQUENCE_DIGITS)?..)?;
    if !tail.iter().all(char::is_ascii_digit) {
        return None;
    }
    tail.iter().collect::<String>().parse().ok()
}

impl fmt::Display for ClientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
