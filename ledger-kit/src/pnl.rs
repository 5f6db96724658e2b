//! P&L attribution

use crate::error::Result;
use attest_core::decimal::checked_add;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decomposition of a P&L figure into its explanatory components
///
/// The total is computed from the components at construction and never
/// accepted as an independent input, so
/// `total == market + carry + trade + residual` cannot be broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnLAttribution {
    market: Decimal,
    carry: Decimal,
    trade: Decimal,
    residual: Decimal,
    total: Decimal,
}

impl PnLAttribution {
    /// Create an attribution; the only failure mode is overflow
    pub fn new(
        market: Decimal,
        carry: Decimal,
        trade: Decimal,
        residual: Decimal,
    ) -> Result<Self> {
        let total = checked_add(
            checked_add(checked_add(market, carry)?, trade)?,
            residual,
        )?;
        Ok(Self {
            market,
            carry,
            trade,
            residual,
            total,
        })
    }

    /// Market-move component
    pub fn market(&self) -> Decimal {
        self.market
    }

    /// Carry component
    pub fn carry(&self) -> Decimal {
        self.carry
    }

    /// New-trade component
    pub fn trade(&self) -> Decimal {
        self.trade
    }

    /// Unexplained residual
    pub fn residual(&self) -> Decimal {
        self.residual
    }

    /// Sum of the four components
    pub fn total(&self) -> Decimal {
        self.total
    }
}
