//! Typed errors for the pricing/risk contract

use thiserror::Error;

/// Result type for contract-shape construction
pub type Result<T> = std::result::Result<T, Error>;

/// Contract-shape validation errors
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

    /// Error surfaced from the attestation core
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

/// Why a pricing or risk request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PricingErrorKind {
    /// A required market input is absent as of the requested time
    MissingObservable,
    /// The model failed to calibrate
    Calibration,
    /// The instrument is not supported by this model
    Unsupported,
    /// Internal model failure
    Internal,
}

/// An instrument could not be priced
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("Pricing failed for {instrument} ({kind:?}): {reason}")]
pub struct PricingError {
    /// Instrument that failed to price
    pub instrument: String,
    /// Failure classification
    pub kind: PricingErrorKind,
    /// Model-supplied reason
    pub reason: String,
}

/// A portfolio risk request could not be served
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("Risk computation failed ({kind:?}): {reason}")]
pub struct RiskError {
    /// Failure classification
    pub kind: PricingErrorKind,
    /// Model-supplied reason
    pub reason: String,
}
