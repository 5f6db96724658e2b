//! Credence ledger primitives
//!
//! Double-entry building blocks whose invariants hold by construction:
//!
//! - **DistinctAccountPair**: no self-transfer, rejected at construction
//! - **Move**: strictly-positive quantity enforced by the numeric wrapper
//! - **Transaction**: immutable ordered batch whose state deltas are
//!   derived from its moves, so debits and credits balance per unit
//! - **PnLAttribution**: total computed from components, never accepted
//!   as an independent input

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod accounts;
pub mod entry;
pub mod error;
pub mod pnl;
pub mod transfer;

// Re-exports
pub use accounts::{AccountId, DistinctAccountPair};
pub use entry::LedgerEntry;
pub use error::{Error, Result};
pub use pnl::PnLAttribution;
pub use transfer::{Move, StateDelta, Transaction};
