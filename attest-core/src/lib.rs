//! Credence attestation core
//!
//! Content-addressed, epistemically-qualified financial facts:
//!
//! - **Exact arithmetic**: `rust_decimal` under one shared context
//!   (28 significant digits, banker's rounding, checked operations)
//! - **Money**: currency-tagged exact decimals with guarded arithmetic
//! - **Canonical form**: deterministic bytes + SHA-256 content hashing
//! - **Confidence**: closed Firm / Quoted / Derived classification
//! - **Attestation**: immutable value + confidence + provenance records
//!   keyed by a collision-resistant identity hash
//!
//! # Invariants
//!
//! - No `Money` can hold a non-finite amount
//! - Cross-currency arithmetic fails, never coerces
//! - Equal values canonicalize to equal bytes on every platform
//! - Identity hashes are injective over (source, timestamp, confidence,
//!   value, provenance) tuples

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod attestation;
pub mod canonical;
pub mod confidence;
pub mod decimal;
pub mod error;
pub mod identifiers;
pub mod money;

// Re-exports
pub use attestation::{Attestation, AttestationRecord, IdentityHash};
pub use canonical::{
    canonical_bytes, content_hash, parse_utc_timestamp, CanonicalValue, Canonicalize, ContentHash,
};
pub use confidence::{Confidence, Derived, Firm, QuoteCondition, Quoted};
pub use decimal::{NonZeroAmount, PositiveAmount};
pub use error::{Error, Result, ResultExt};
pub use identifiers::{EntityId, SecurityId, TransactionRef};
pub use money::Money;
