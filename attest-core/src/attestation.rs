//! Attestations: values wrapped with confidence, source, time and provenance
//!
//! Two distinct hashes per attestation, both load-bearing:
//!
//! - **content hash** — over the value alone; supports dedup-by-value
//! - **identity hash** — over (source, timestamp, confidence, value,
//!   provenance); the storage key, so two observations of the same number
//!   from different sources never collide
//!
//! Attestations are immutable once constructed. There is no update or
//! delete transition anywhere in the system.

use crate::canonical::{
    canonical_bytes, content_hash, sha256, CanonicalValue, Canonicalize, ContentHash,
};
use crate::confidence::Confidence;
use crate::error::{Error, Result, ResultExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA-256 hash of an attestation's full identity tuple
///
/// Deterministic across processes, so concurrent duplicate stores of the
/// same attestation converge on one record with no coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityHash([u8; 32]);

impl IdentityHash {
    /// Wrap a raw digest
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Immutable attested value
#[derive(Debug, Clone, PartialEq)]
pub struct Attestation<T> {
    value: T,
    confidence: Confidence,
    source: String,
    timestamp: DateTime<Utc>,
    provenance: Vec<IdentityHash>,
    content_hash: ContentHash,
    identity_hash: IdentityHash,
}

impl<T: Canonicalize> Attestation<T> {
    /// Construct an attestation, computing both hashes
    ///
    /// Fails if the source is empty or the value cannot be canonically
    /// serialized. The provenance list is an ordered sequence of identity
    /// hashes of upstream attestations; empty for primary observations.
    pub fn new(
        value: T,
        confidence: Confidence,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
        provenance: Vec<IdentityHash>,
    ) -> Result<Self> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(Error::validation("source", "must be non-empty"));
        }

        let value_canonical = value
            .to_canonical()
            .context("canonicalizing attested value")?;
        let content_hash = content_hash(&value_canonical)?;
        let identity_hash = compute_identity_hash(
            &source,
            timestamp,
            &confidence,
            &value_canonical,
            value.type_tag(),
            &provenance,
        )?;

        tracing::debug!(
            identity = %identity_hash,
            content = %content_hash,
            source = %source,
            "attestation constructed"
        );

        Ok(Self {
            value,
            confidence,
            source,
            timestamp,
            provenance,
            content_hash,
            identity_hash,
        })
    }

    /// Attested value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Epistemic confidence of the value
    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    /// Attesting source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Attestation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identity hashes of the attestations this one was derived from
    pub fn provenance(&self) -> &[IdentityHash] {
        &self.provenance
    }

    /// Hash of the value alone
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Hash of the full identity tuple; the storage key
    pub fn identity_hash(&self) -> IdentityHash {
        self.identity_hash
    }

    /// Type-erase into the durable record shape
    ///
    /// `valid_time` is when the fact occurred, `system_time` when the
    /// system learned of it. The hashes carry over unchanged.
    pub fn into_record(
        self,
        valid_time: DateTime<Utc>,
        system_time: DateTime<Utc>,
    ) -> Result<AttestationRecord> {
        let value_canonical = self
            .value
            .to_canonical()
            .context("canonicalizing attested value for storage")?;
        Ok(AttestationRecord {
            value: value_canonical,
            value_type: self.value.type_tag().to_string(),
            confidence: self.confidence,
            source: self.source,
            timestamp: self.timestamp,
            provenance: self.provenance,
            content_hash: self.content_hash,
            identity_hash: self.identity_hash,
            valid_time,
            system_time,
        })
    }
}

fn compute_identity_hash(
    source: &str,
    timestamp: DateTime<Utc>,
    confidence: &Confidence,
    value_canonical: &CanonicalValue,
    value_type: &str,
    provenance: &[IdentityHash],
) -> Result<IdentityHash> {
    let identity = CanonicalValue::record(
        "attestation",
        [
            ("source", CanonicalValue::Text(source.to_string())),
            ("timestamp", CanonicalValue::Timestamp(timestamp)),
            ("confidence", confidence.to_canonical()?),
            ("value", value_canonical.clone()),
            ("value_type", CanonicalValue::Text(value_type.to_string())),
            (
                "provenance",
                CanonicalValue::Sequence(
                    provenance
                        .iter()
                        .map(|h| CanonicalValue::Bytes(h.as_bytes().to_vec()))
                        .collect(),
                ),
            ),
        ],
    );
    Ok(IdentityHash(sha256(&canonical_bytes(&identity)?)))
}

/// Durable, type-erased attestation record
///
/// The shape a store or bus message carries: the canonical value payload
/// plus its type tag, the confidence, provenance, both hashes, and the
/// bitemporal pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Canonical value payload
    pub value: CanonicalValue,
    /// Value type tag
    pub value_type: String,
    /// Epistemic confidence
    pub confidence: Confidence,
    /// Attesting source
    pub source: String,
    /// Attestation time
    pub timestamp: DateTime<Utc>,
    /// Ordered upstream identity hashes
    pub provenance: Vec<IdentityHash>,
    /// Hash of the value alone
    pub content_hash: ContentHash,
    /// Hash of the full identity tuple
    pub identity_hash: IdentityHash,
    /// When the fact occurred
    pub valid_time: DateTime<Utc>,
    /// When the system learned of the fact
    pub system_time: DateTime<Utc>,
}

impl AttestationRecord {
    /// Recompute both hashes and compare against the stored ones
    ///
    /// A mismatch means the record was tampered with or corrupted in
    /// flight; callers halt rather than attempt recovery.
    pub fn verify_hashes(&self) -> Result<()> {
        let expected_content = content_hash(&self.value)?;
        if expected_content != self.content_hash {
            return Err(Error::Corruption(format!(
                "content hash mismatch for {}: expected {expected_content}, found {}",
                self.identity_hash, self.content_hash
            )));
        }
        let expected_identity = compute_identity_hash(
            &self.source,
            self.timestamp,
            &self.confidence,
            &self.value,
            &self.value_type,
            &self.provenance,
        )?;
        if expected_identity != self.identity_hash {
            return Err(Error::Corruption(format!(
                "identity hash mismatch: expected {expected_identity}, found {}",
                self.identity_hash
            )));
        }
        Ok(())
    }
}
