//! Error types for the attestation domain
//!
//! Every fallible operation returns [`Result`]; errors are values, never
//! raised control flow. Context is added across layer boundaries by
//! wrapping, keeping the original error reachable through `source()`.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for attestation domain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attestation domain errors
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

    /// Arithmetic between two differently-denominated amounts
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand
        left: String,
        /// Currency of the right operand
        right: String,
    },

    /// Trapped arithmetic fault (overflow, invalid operation, divide by zero)
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Value could not be canonically serialized
    #[error("Canonical serialization failed: {0}")]
    Canonical(String),

    /// A derived-confidence model failed to fit
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// A required market input is absent as of the requested time
    #[error("Missing observable {observable} as of {as_of}")]
    MissingObservable {
        /// Name of the absent observable
        observable: String,
        /// Requested as-of time
        as_of: DateTime<Utc>,
    },

    /// An accounting identity failed
    #[error("Conservation violation: {0}")]
    ConservationViolation(String),

    /// A stored record no longer matches its own hashes
    #[error("Corrupt record: {0}")]
    Corruption(String),

    /// Error enriched with caller context, original error preserved
    #[error("{context}: {source}")]
    Context {
        /// Human-readable context added at a layer boundary
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
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

/// Context enrichment for domain results
pub trait ResultExt<T> {
    /// Wrap the error with context without discarding it
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: context.into(),
            source: Box::new(source),
        })
    }
}
