//! Currency-tagged exact-decimal money
//!
//! Arithmetic between two `Money` values is defined only when the
//! currencies match; anything else is a failure, never a coercion.

use crate::canonical::{CanonicalValue, Canonicalize};
use crate::decimal::{self, NonZeroAmount};
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minor-unit exponent for a currency code
///
/// 2 for most fiat, 0 for yen-like currencies, 3 for the three-decimal
/// dinars, 8 and 18 for the two reference crypto assets.
pub fn minor_unit(currency: &str) -> u32 {
    match currency {
        "JPY" | "KRW" | "VND" | "CLP" => 0,
        "BHD" | "KWD" | "OMR" | "TND" | "JOD" => 3,
        "BTC" => 8,
        "ETH" => 18,
        _ => 2,
    }
}

/// Exact monetary value in a single currency
///
/// Constructed only through [`Money::new`]; the amount is finite by type
/// (`Decimal` cannot represent NaN or infinities) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Create a money value; fails on an empty currency code
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self> {
        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(Error::validation("currency", "currency code must be non-empty"));
        }
        Ok(Self { amount, currency })
    }

    /// Additive identity for a currency
    pub fn zero(currency: impl Into<String>) -> Result<Self> {
        Self::new(Decimal::ZERO, currency)
    }

    /// Amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Currency code
    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn require_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }

    /// Add two amounts in the same currency
    pub fn add(&self, other: &Money) -> Result<Money> {
        self.require_same_currency(other)?;
        Ok(Money {
            amount: decimal::checked_add(self.amount, other.amount)?,
            currency: self.currency.clone(),
        })
    }

    /// Subtract an amount in the same currency
    pub fn sub(&self, other: &Money) -> Result<Money> {
        self.require_same_currency(other)?;
        Ok(Money {
            amount: decimal::checked_sub(self.amount, other.amount)?,
            currency: self.currency.clone(),
        })
    }

    /// Scale by a dimensionless factor
    pub fn mul(&self, scalar: Decimal) -> Result<Money> {
        Ok(Money {
            amount: decimal::checked_mul(self.amount, scalar)?,
            currency: self.currency.clone(),
        })
    }

    /// Divide by a guaranteed-non-zero scalar
    pub fn div(&self, divisor: NonZeroAmount) -> Result<Money> {
        Ok(Money {
            amount: decimal::checked_div(self.amount, divisor.get())?,
            currency: self.currency.clone(),
        })
    }

    /// Flip the sign; preserves currency, never fails
    pub fn negate(&self) -> Money {
        Money {
            amount: -self.amount,
            currency: self.currency.clone(),
        }
    }

    /// Quantize to the currency's minor unit with banker's rounding
    pub fn round_to_minor_unit(&self) -> Money {
        Money {
            amount: decimal::quantize(self.amount, minor_unit(&self.currency)),
            currency: self.currency.clone(),
        }
    }

    /// True when the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl Canonicalize for Money {
    fn type_tag(&self) -> &'static str {
        "money"
    }

    fn to_canonical(&self) -> Result<CanonicalValue> {
        Ok(CanonicalValue::record(
            "money",
            [
                ("amount", CanonicalValue::Decimal(self.amount)),
                ("currency", CanonicalValue::Text(self.currency.clone())),
            ],
        ))
    }
}
