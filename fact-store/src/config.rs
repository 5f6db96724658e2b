//! Configuration for the persistence layer

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bound on every store/log operation (milliseconds)
    pub operation_timeout_ms: u64,

    /// Capacity of the log writer mailbox (backpressure bound)
    pub writer_mailbox_capacity: usize,

    /// Verify record hashes before accepting a store
    pub verify_on_store: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: 5_000,
            writer_mailbox_capacity: 1_024,
            verify_on_store: true,
        }
    }
}

impl StoreConfig {
    /// Operation timeout as a [`Duration`]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Serialization(format!("Failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("Failed to parse config: {e}")))
    }

    /// Load defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = StoreConfig::default();

        if let Ok(ms) = std::env::var("FACT_STORE_TIMEOUT_MS") {
            config.operation_timeout_ms = ms
                .parse()
                .map_err(|e| Error::Serialization(format!("FACT_STORE_TIMEOUT_MS: {e}")))?;
        }

        if let Ok(capacity) = std::env::var("FACT_STORE_MAILBOX_CAPACITY") {
            config.writer_mailbox_capacity = capacity
                .parse()
                .map_err(|e| Error::Serialization(format!("FACT_STORE_MAILBOX_CAPACITY: {e}")))?;
        }

        Ok(config)
    }
}
