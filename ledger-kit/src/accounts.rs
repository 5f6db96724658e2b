//! Account identifiers and distinct-account pairs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier (IBAN, internal book, nostro reference)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and wrap an account identifier
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::validation("account", "must be non-empty"));
        }
        Ok(Self(id))
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> String {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Debit/credit account pair that cannot be a self-transfer
///
/// The structural form of the double-entry rule: a pair with equal
/// accounts is unrepresentable, so no runtime check downstream can be
/// forgotten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistinctAccountPair {
    debit: AccountId,
    credit: AccountId,
}

impl DistinctAccountPair {
    /// Create a pair; fails when debit and credit are the same account
    pub fn new(debit: AccountId, credit: AccountId) -> Result<Self> {
        if debit == credit {
            return Err(Error::validation(
                "accounts",
                format!("debit and credit are both {debit}"),
            ));
        }
        Ok(Self { debit, credit })
    }

    /// Debited account
    pub fn debit(&self) -> &AccountId {
        &self.debit
    }

    /// Credited account
    pub fn credit(&self) -> &AccountId {
        &self.credit
    }
}
