//! Shared decimal arithmetic context
//!
//! All money arithmetic in the system runs under one context: the 96-bit
//! exact decimal (28 significant digits) with round-half-to-even. The
//! context is a property of the `Decimal` type plus the constants below,
//! so it cannot leak or drift between threads. Overflow, invalid
//! operations and division by zero are trapped as [`Error::Arithmetic`]
//! at the call site, never silent wrap-around and never a panic.

use crate::error::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounding rule applied everywhere: banker's rounding
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Significant digits carried by the shared context
pub const SIGNIFICANT_DIGITS: u32 = 28;

/// Checked addition under the shared context
pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| Error::Arithmetic(format!("overflow adding {a} and {b}")))
}

/// Checked subtraction under the shared context
pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| Error::Arithmetic(format!("overflow subtracting {b} from {a}")))
}

/// Checked multiplication under the shared context
pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| Error::Arithmetic(format!("overflow multiplying {a} by {b}")))
}

/// Checked division under the shared context
pub fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(Error::Arithmetic(format!("division of {a} by zero")));
    }
    a.checked_div(b)
        .ok_or_else(|| Error::Arithmetic(format!("overflow dividing {a} by {b}")))
}

/// Quantize to `dp` decimal places with the shared rounding rule
pub fn quantize(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, ROUNDING)
}

/// Parse a decimal from text
///
/// `Decimal` cannot represent NaN or infinities, so the string boundary is
/// where non-finite values are refused.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .map_err(|e| Error::validation("decimal", format!("{s:?} is not a finite decimal: {e}")))
}

/// Strictly positive decimal amount
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PositiveAmount(Decimal);

impl PositiveAmount {
    /// Create a positive amount, rejecting zero and negatives
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(Error::validation(
                "amount",
                format!("{value} is not strictly positive"),
            ));
        }
        Ok(Self(value))
    }

    /// Underlying decimal
    pub fn get(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PositiveAmount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PositiveAmount> for Decimal {
    fn from(value: PositiveAmount) -> Decimal {
        value.0
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-zero decimal, the only accepted divisor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct NonZeroAmount(Decimal);

impl NonZeroAmount {
    /// Create a non-zero amount
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_zero() {
            return Err(Error::validation("amount", "must be non-zero"));
        }
        Ok(Self(value))
    }

    /// Underlying decimal
    pub fn get(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for NonZeroAmount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NonZeroAmount> for Decimal {
    fn from(value: NonZeroAmount) -> Decimal {
        value.0
    }
}

impl fmt::Display for NonZeroAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_div_by_zero_is_error() {
        let result = checked_div(dec!(1), Decimal::ZERO);
        assert!(matches!(result, Err(Error::Arithmetic(_))));
    }

    #[test]
    fn test_checked_mul_overflow_is_error() {
        let result = checked_mul(Decimal::MAX, dec!(2));
        assert!(matches!(result, Err(Error::Arithmetic(_))));
    }

    #[test]
    fn test_quantize_uses_bankers_rounding() {
        assert_eq!(quantize(dec!(2.5), 0), dec!(2));
        assert_eq!(quantize(dec!(3.5), 0), dec!(4));
        assert_eq!(quantize(dec!(1.005), 2), dec!(1.00));
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("Infinity").is_err());
        assert!(parse_decimal("-inf").is_err());
        assert_eq!(parse_decimal("100.25").unwrap(), dec!(100.25));
    }

    #[test]
    fn test_positive_amount_rejects_zero_and_negative() {
        assert!(PositiveAmount::new(Decimal::ZERO).is_err());
        assert!(PositiveAmount::new(dec!(-0.01)).is_err());
        assert_eq!(PositiveAmount::new(dec!(0.01)).unwrap().get(), dec!(0.01));
    }

    #[test]
    fn test_non_zero_amount_rejects_zero() {
        assert!(NonZeroAmount::new(Decimal::ZERO).is_err());
        assert_eq!(NonZeroAmount::new(dec!(-2)).unwrap().get(), dec!(-2));
    }
}
