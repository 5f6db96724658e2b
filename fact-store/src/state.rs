//! Checkpoint and offset storage
//!
//! Holds consumer offsets and checkpoint markers only - never accounting
//! state, which lives exclusively in the transaction log and the
//! attestation store.

use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Small keyed byte store for checkpoints and offsets
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch a value if present
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value under a key
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// In-memory reference state store
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStateStore {
    /// Create an empty state store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
