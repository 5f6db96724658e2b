//! Ledger entries

use crate::accounts::DistinctAccountPair;
use attest_core::canonical::{CanonicalValue, Canonicalize};
use attest_core::identifiers::SecurityId;
use attest_core::{IdentityHash, PositiveAmount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Posted double-entry record for one instrument
///
/// The account pair and the positive amount carry the invariants; an
/// entry that exists is balanced by construction. The optional
/// attestation is a store-resolved identity-hash reference, keeping the
/// entry a plain value with no embedded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    accounts: DistinctAccountPair,
    instrument: SecurityId,
    amount: PositiveAmount,
    timestamp: DateTime<Utc>,
    attestation: Option<IdentityHash>,
}

impl LedgerEntry {
    /// Create a ledger entry
    pub fn new(
        accounts: DistinctAccountPair,
        instrument: SecurityId,
        amount: PositiveAmount,
        timestamp: DateTime<Utc>,
        attestation: Option<IdentityHash>,
    ) -> Self {
        Self {
            accounts,
            instrument,
            amount,
            timestamp,
            attestation,
        }
    }

    /// Debit/credit pair
    pub fn accounts(&self) -> &DistinctAccountPair {
        &self.accounts
    }

    /// Instrument moved
    pub fn instrument(&self) -> &SecurityId {
        &self.instrument
    }

    /// Posted amount, strictly positive
    pub fn amount(&self) -> PositiveAmount {
        self.amount
    }

    /// Posting time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identity hash of the supporting attestation, if any
    pub fn attestation(&self) -> Option<IdentityHash> {
        self.attestation
    }
}

impl Canonicalize for LedgerEntry {
    fn type_tag(&self) -> &'static str {
        "ledger.entry"
    }

    fn to_canonical(&self) -> attest_core::Result<CanonicalValue> {
        let mut fields = vec![
            (
                "debit",
                CanonicalValue::Text(self.accounts.debit().as_str().to_string()),
            ),
            (
                "credit",
                CanonicalValue::Text(self.accounts.credit().as_str().to_string()),
            ),
            (
                "instrument",
                CanonicalValue::Text(self.instrument.as_str().to_string()),
            ),
            ("amount", CanonicalValue::Decimal(self.amount.get())),
            ("timestamp", CanonicalValue::Timestamp(self.timestamp)),
        ];
        if let Some(attestation) = self.attestation {
            fields.push((
                "attestation",
                CanonicalValue::Bytes(attestation.as_bytes().to_vec()),
            ));
        }
        Ok(CanonicalValue::record(self.type_tag(), fields))
    }
}
