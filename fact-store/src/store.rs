//! Attestation storage
//!
//! Keyed by identity hash, idempotent, append-only. The trait has no
//! update or delete: the only terminal states for a record are "present"
//! and "absent".

use crate::error::{Error, Result};
use crate::metrics::{STORE_OPS_TOTAL, STORE_OP_DURATION};
use async_trait::async_trait;
use attest_core::{AttestationRecord, IdentityHash};
use dashmap::DashMap;
use std::time::Instant;

/// Content-addressed attestation store
#[async_trait]
pub trait AttestationStore: Send + Sync {
    /// Store a record, keyed by its identity hash
    ///
    /// Idempotent: storing the same identity hash twice never creates a
    /// duplicate and returns the same hash both times.
    async fn store(&self, record: AttestationRecord) -> Result<IdentityHash>;

    /// Retrieve a record; absent records are a `NotFound` failure
    async fn retrieve(&self, id: &IdentityHash) -> Result<AttestationRecord>;

    /// Whether a record is present
    ///
    /// Fallible by contract: a real backing store can fail independently
    /// of the answer.
    async fn exists(&self, id: &IdentityHash) -> Result<bool>;

    /// Number of stored records
    async fn count(&self) -> Result<u64>;
}

/// In-memory reference store
///
/// Safe under concurrent writers with no coordination: duplicate stores
/// of the same attestation converge on one record because the key is a
/// deterministic identity hash.
#[derive(Debug)]
pub struct MemoryAttestationStore {
    records: DashMap<IdentityHash, AttestationRecord>,
    verify_on_store: bool,
}

impl Default for MemoryAttestationStore {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
            verify_on_store: true,
        }
    }
}

impl MemoryAttestationStore {
    /// Create an empty store with hash verification on
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store configured from [`StoreConfig`]
    pub fn with_config(config: &crate::config::StoreConfig) -> Self {
        Self {
            records: DashMap::new(),
            verify_on_store: config.verify_on_store,
        }
    }
}

#[async_trait]
impl AttestationStore for MemoryAttestationStore {
    async fn store(&self, record: AttestationRecord) -> Result<IdentityHash> {
        let start = Instant::now();

        // A record that fails its own hashes is rejected, never stored
        if self.verify_on_store {
            record.verify_hashes().map_err(|e| {
                STORE_OPS_TOTAL.with_label_values(&["store", "rejected"]).inc();
                Error::from(e)
            })?;
        }

        let id = record.identity_hash;
        match self.records.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                // Same identity hash with different content is either an
                // attempted overwrite or a hash collision; both halt here.
                if *existing.get() != record {
                    STORE_OPS_TOTAL.with_label_values(&["store", "conflict"]).inc();
                    return Err(Error::IllegalTransition(format!(
                        "attestation {id} is already stored with different content"
                    )));
                }
                tracing::debug!(identity = %id, "duplicate store, converged");
                STORE_OPS_TOTAL.with_label_values(&["store", "duplicate"]).inc();
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record);
                STORE_OPS_TOTAL.with_label_values(&["store", "stored"]).inc();
            }
        }

        STORE_OP_DURATION
            .with_label_values(&["store"])
            .observe(start.elapsed().as_secs_f64());
        Ok(id)
    }

    async fn retrieve(&self, id: &IdentityHash) -> Result<AttestationRecord> {
        let record = self
            .records
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound(format!("attestation {id}")));

        let status = if record.is_ok() { "found" } else { "missing" };
        STORE_OPS_TOTAL.with_label_values(&["retrieve", status]).inc();
        record
    }

    async fn exists(&self, id: &IdentityHash) -> Result<bool> {
        Ok(self.records.contains_key(id))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }
}
