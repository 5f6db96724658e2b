//! Credence persistence protocols
//!
//! Abstract store/log/bus interfaces plus in-memory reference
//! implementations:
//!
//! - **AttestationStore**: idempotent, identity-hash keyed, append-only
//! - **TransactionLog**: single-writer bitemporal log with full replay
//! - **EventBus**: topic pub/sub boundary (transport lives elsewhere)
//! - **StateStore**: checkpoint/offset storage, never accounting state
//!
//! # Concurrency
//!
//! The domain layer is pure; all concurrency discipline lives here. The
//! transaction log has exactly one writer (an actor owning the log), so
//! ledger mutations apply in one total order. Attestation storage is safe
//! under concurrent writers because it is idempotent and keyed by a
//! deterministic identity hash. Every operation completes or fails within
//! a bounded timeout; timeout is a retryable persistence failure.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod bus;
pub mod config;
pub mod error;
pub mod log;
pub mod metrics;
pub mod provenance;
pub mod state;
pub mod store;
pub mod writer;

// Re-exports
pub use bus::{EventBus, MemoryEventBus, PublishedMessage, Topic};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use log::{BitemporalEnvelope, LogEvent, LogRecord, MemoryTransactionLog, TransactionLog};
pub use provenance::walk_provenance;
pub use state::{MemoryStateStore, StateStore};
pub use store::{AttestationStore, MemoryAttestationStore};
pub use writer::{spawn_log_writer, LogWriterHandle};
