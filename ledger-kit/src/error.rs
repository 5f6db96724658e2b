//! Error types for ledger primitives

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Field-level constraint violation
    #[error("Validation failed for {field}: {reason}")]
    Validation {
        /// Field that failed validation
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Debits and credits fail to balance
    #[error("Conservation violation: {0}")]
    Conservation(String),

    /// Error bubbled up from the attestation core
    #[error(transparent)]
    Core(#[from] attest_core::Error),
}

impl Error {
    /// Shorthand for a field-level validation failure
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}
