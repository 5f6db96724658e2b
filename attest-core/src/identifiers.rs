//! Validated identifier types
//!
//! Entity, transaction and security identifiers with construction-time
//! validation. A malformed identifier is rejected as data, never stored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 20-character alphanumeric entity identifier (LEI-shaped)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Validate and wrap an entity identifier
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != 20 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::validation(
                "entity_id",
                format!("{id:?} is not a 20-character alphanumeric identifier"),
            ));
        }
        Ok(Self(id))
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 1-52 character transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Validate and wrap a transaction reference
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > 52 {
            return Err(Error::validation(
                "transaction_ref",
                format!("{id:?} must be 1-52 characters"),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(Error::validation(
                "transaction_ref",
                format!("{id:?} contains whitespace or control characters"),
            ));
        }
        Ok(Self(id))
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 12-character security identifier with Luhn check digit (ISIN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecurityId(String);

impl SecurityId {
    /// Validate and wrap a security identifier
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != 12 {
            return Err(Error::validation(
                "security_id",
                format!("{id:?} is not 12 characters"),
            ));
        }
        if !id.chars().take(2).all(|c| c.is_ascii_uppercase()) {
            return Err(Error::validation(
                "security_id",
                format!("{id:?} does not start with a two-letter country code"),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(Error::validation(
                "security_id",
                format!("{id:?} contains characters outside [0-9A-Z]"),
            ));
        }
        if !luhn_valid(&id) {
            return Err(Error::validation(
                "security_id",
                format!("{id:?} fails its check digit"),
            ));
        }
        Ok(Self(id))
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Luhn check over the alphanumeric-to-digit expansion (A=10 ... Z=35)
fn luhn_valid(id: &str) -> bool {
    let mut digits = Vec::with_capacity(id.len() * 2);
    for c in id.chars() {
        if let Some(d) = c.to_digit(10) {
            digits.push(d);
        } else {
            let value = c as u32 - 'A' as u32 + 10;
            digits.push(value / 10);
            digits.push(value % 10);
        }
    }

    let mut sum = 0;
    for (position, digit) in digits.iter().rev().enumerate() {
        let mut d = *digit;
        // Double every second digit, counting from the check digit
        if position % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

macro_rules! identifier_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = Error;

                fn try_from(value: String) -> Result<Self> {
                    Self::new(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> String {
                    value.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

identifier_conversions!(EntityId, TransactionRef, SecurityId);
