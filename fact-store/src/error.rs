//! Error types for the persistence layer

use thiserror::Error;

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, Error>;

/// Persistence errors
#[derive(Error, Debug)]
pub enum Error {
    /// Operation exceeded its bounded timeout; retryable
    #[error("Timeout after {elapsed_ms}ms in {operation}")]
    Timeout {
        /// Operation that timed out
        operation: &'static str,
        /// Time spent before giving up
        elapsed_ms: u64,
    },

    /// Requested record is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing transport or store went away; retryable
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Attempted state change outside the allowed lifecycle, e.g.
    /// replacing an already-stored record
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    /// Writer actor mailbox closed or reply dropped
    #[error("Writer unavailable: {0}")]
    Writer(String),

    /// Append would violate log ordering
    #[error("Out of order: {0}")]
    OutOfOrder(String),

    /// Record could not be serialized for storage or transport
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error surfaced from the attestation core
    #[error(transparent)]
    Core(#[from] attest_core::Error),

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

/// Context enrichment for persistence results
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
