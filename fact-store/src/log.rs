//! Append-only bitemporal transaction log
//!
//! Records carry both when the fact occurred (valid time) and when the
//! system learned of it (system time). The log assigns contiguous
//! sequence numbers and exposes no mutation surface: replay is the only
//! read, append the only write.

use crate::error::{Error, Result};
use crate::metrics::LOG_APPEND_TOTAL;
use async_trait::async_trait;
use attest_core::CanonicalValue;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Payload wrapped with its two temporal coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitemporalEnvelope<T> {
    /// The wrapped payload
    pub payload: T,
    /// When the fact occurred
    pub valid_time: DateTime<Utc>,
    /// When the system learned of it; non-decreasing per writer
    pub system_time: DateTime<Utc>,
}

impl<T> BitemporalEnvelope<T> {
    /// Wrap a payload with its temporal coordinates
    pub fn new(payload: T, valid_time: DateTime<Utc>, system_time: DateTime<Utc>) -> Self {
        Self {
            payload,
            valid_time,
            system_time,
        }
    }
}

/// Event carried by a log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event-type tag (e.g. `transaction.applied`)
    pub event_type: String,
    /// Canonical event payload
    pub payload: CanonicalValue,
    /// Caller-supplied idempotency key; a retry with the same key is a
    /// no-op, never a duplicate record
    pub idempotency_key: Uuid,
    /// Origin-message reference, when the event arrived over the bus
    pub origin: Option<String>,
}

/// Durable log record: sequence number plus bitemporal event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Position in the total order, assigned by the log
    pub sequence: u64,
    /// The appended envelope
    pub envelope: BitemporalEnvelope<LogEvent>,
}

/// Append-only transaction log
///
/// Mutation of persisted records is structurally rejected: the trait has
/// no update or delete.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Append an envelope to the log
    ///
    /// If this does not return success the caller must assume the append
    /// did not happen and may retry with the same idempotency key.
    async fn append(&self, envelope: BitemporalEnvelope<LogEvent>) -> Result<()>;

    /// Full ordered history
    async fn replay(&self) -> Result<Vec<LogRecord>>;

    /// Records with `system_time >= since`, in order
    async fn replay_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>>;
}

#[derive(Debug, Default)]
struct LogInner {
    records: Vec<LogRecord>,
    seen_keys: HashSet<Uuid>,
}

/// In-memory reference log
#[derive(Debug, Default)]
pub struct MemoryTransactionLog {
    inner: RwLock<LogInner>,
}

impl MemoryTransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, duplicates excluded
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TransactionLog for MemoryTransactionLog {
    async fn append(&self, envelope: BitemporalEnvelope<LogEvent>) -> Result<()> {
        let mut inner = self.inner.write();

        // Retry with a known idempotency key converges without a new record
        if inner.seen_keys.contains(&envelope.payload.idempotency_key) {
            tracing::debug!(
                idempotency_key = %envelope.payload.idempotency_key,
                "duplicate append, converged"
            );
            LOG_APPEND_TOTAL.with_label_values(&["duplicate"]).inc();
            return Ok(());
        }

        // System time is non-decreasing within the single writer
        if let Some(last) = inner.records.last() {
            if envelope.system_time < last.envelope.system_time {
                LOG_APPEND_TOTAL.with_label_values(&["rejected"]).inc();
                return Err(Error::OutOfOrder(format!(
                    "system_time {} precedes log head {}",
                    envelope.system_time, last.envelope.system_time
                )));
            }
        }

        let sequence = inner.records.len() as u64;
        inner.seen_keys.insert(envelope.payload.idempotency_key);
        inner.records.push(LogRecord { sequence, envelope });
        LOG_APPEND_TOTAL.with_label_values(&["appended"]).inc();
        Ok(())
    }

    async fn replay(&self) -> Result<Vec<LogRecord>> {
        Ok(self.inner.read().records.clone())
    }

    async fn replay_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
        Ok(self
            .inner
            .read()
            .records
            .iter()
            .filter(|record| record.envelope.system_time >= since)
            .cloned()
            .collect())
    }
}
