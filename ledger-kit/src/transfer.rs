//! Moves, state deltas and transactions

use crate::accounts::AccountId;
use crate::error::{Error, Result};
use attest_core::decimal::checked_add;
use attest_core::identifiers::TransactionRef;
use attest_core::PositiveAmount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Single transfer of a positive quantity between two distinct accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    source: AccountId,
    destination: AccountId,
    unit: String,
    quantity: PositiveAmount,
    contract_ref: TransactionRef,
}

impl Move {
    /// Create a move; the quantity wrapper already guarantees positivity,
    /// and source == destination is rejected here
    pub fn new(
        source: AccountId,
        destination: AccountId,
        unit: impl Into<String>,
        quantity: PositiveAmount,
        contract_ref: TransactionRef,
    ) -> Result<Self> {
        let unit = unit.into();
        if unit.trim().is_empty() {
            return Err(Error::validation("unit", "must be non-empty"));
        }
        if source == destination {
            return Err(Error::validation(
                "accounts",
                format!("move from {source} to itself"),
            ));
        }
        Ok(Self {
            source,
            destination,
            unit,
            quantity,
            contract_ref,
        })
    }

    /// Debited account
    pub fn source(&self) -> &AccountId {
        &self.source
    }

    /// Credited account
    pub fn destination(&self) -> &AccountId {
        &self.destination
    }

    /// Unit being moved (currency code or instrument identifier)
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Quantity moved, strictly positive
    pub fn quantity(&self) -> PositiveAmount {
        self.quantity
    }

    /// Contract under which the move happens
    pub fn contract_ref(&self) -> &TransactionRef {
        &self.contract_ref
    }
}

/// Signed account-level effect of a move
///
/// Closed two-variant delta; exhaustive matching keeps any new kind of
/// balance change a compile-time event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateDelta {
    /// Balance decrease on the debited account
    Debit {
        /// Affected account
        account: AccountId,
        /// Unit of the change
        unit: String,
        /// Magnitude, strictly positive
        amount: PositiveAmount,
    },
    /// Balance increase on the credited account
    Credit {
        /// Affected account
        account: AccountId,
        /// Unit of the change
        unit: String,
        /// Magnitude, strictly positive
        amount: PositiveAmount,
    },
}

/// Immutable ordered batch of moves, applied all-or-nothing
///
/// State deltas are derived from the moves at construction - one debit
/// and one credit per move - so the per-unit balance identity cannot be
/// constructed away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionRef,
    moves: Vec<Move>,
    timestamp: DateTime<Utc>,
    state_deltas: Vec<StateDelta>,
}

impl Transaction {
    /// Create a transaction from a non-empty ordered batch of moves
    pub fn new(id: TransactionRef, moves: Vec<Move>, timestamp: DateTime<Utc>) -> Result<Self> {
        if moves.is_empty() {
            return Err(Error::validation("moves", "transaction has no moves"));
        }

        let mut state_deltas = Vec::with_capacity(moves.len() * 2);
        for mv in &moves {
            state_deltas.push(StateDelta::Debit {
                account: mv.source.clone(),
                unit: mv.unit.clone(),
                amount: mv.quantity,
            });
            state_deltas.push(StateDelta::Credit {
                account: mv.destination.clone(),
                unit: mv.unit.clone(),
                amount: mv.quantity,
            });
        }

        tracing::debug!(
            transaction = %id,
            moves = moves.len(),
            "transaction assembled"
        );

        Ok(Self {
            id,
            moves,
            timestamp,
            state_deltas,
        })
    }

    /// Transaction identifier
    pub fn id(&self) -> &TransactionRef {
        &self.id
    }

    /// Ordered moves
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Transaction time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Derived account-level deltas, two per move
    pub fn state_deltas(&self) -> &[StateDelta] {
        &self.state_deltas
    }

    /// Re-verify that debits equal credits for every unit
    ///
    /// Holds by construction; a failure here means an upstream bug
    /// corrupted the batch, reported as a conservation violation.
    pub fn conservation_check(&self) -> Result<()> {
        let mut totals: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();

        for delta in &self.state_deltas {
            match delta {
                StateDelta::Debit { unit, amount, .. } => {
                    let entry = totals.entry(unit.as_str()).or_default();
                    entry.0 = checked_add(entry.0, amount.get())?;
                }
                StateDelta::Credit { unit, amount, .. } => {
                    let entry = totals.entry(unit.as_str()).or_default();
                    entry.1 = checked_add(entry.1, amount.get())?;
                }
            }
        }

        for (unit, (debits, credits)) in totals {
            if debits != credits {
                return Err(Error::Conservation(format!(
                    "transaction {}: unit {unit} debits {debits} != credits {credits}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}
