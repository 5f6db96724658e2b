//! Contract data shapes for pricing and risk

use crate::error::{Error, Result};
use attest_core::identifiers::SecurityId;
use attest_core::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! reference_newtype {
    ($(#[$doc:meta] $name:ident => $field:literal),* $(,)?) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
            #[serde(try_from = "String", into = "String")]
            pub struct $name(String);

            impl $name {
                /// Validate and wrap a reference
                pub fn new(value: impl Into<String>) -> Result<Self> {
                    let value = value.into();
                    if value.trim().is_empty() {
                        return Err(Error::validation($field, "must be non-empty"));
                    }
                    Ok(Self(value))
                }

                /// Reference text
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = Error;

                fn try_from(value: String) -> Result<Self> {
                    Self::new(value)
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> String {
                    value.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

reference_newtype!(
    /// Reference to a priceable instrument
    InstrumentRef => "instrument_ref",
    /// Reference to a market-data snapshot
    MarketSnapshotRef => "market_snapshot_ref",
    /// Reference to a model configuration
    ModelConfigRef => "model_config_ref",
);

/// Result of pricing one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    net_value: Money,
    components: BTreeMap<String, Money>,
    as_of: DateTime<Utc>,
}

impl Valuation {
    /// Create a valuation
    ///
    /// Every component must share the net value's currency, and a
    /// non-empty breakdown must sum exactly to the net value.
    pub fn new(
        net_value: Money,
        components: BTreeMap<String, Money>,
        as_of: DateTime<Utc>,
    ) -> Result<Self> {
        for (name, component) in &components {
            if component.currency() != net_value.currency() {
                return Err(Error::validation(
                    "components",
                    format!(
                        "component {name} is in {}, net value in {}",
                        component.currency(),
                        net_value.currency()
                    ),
                ));
            }
        }

        if !components.is_empty() {
            let mut sum = Money::zero(net_value.currency())?;
            for component in components.values() {
                sum = sum.add(component)?;
            }
            if sum.amount() != net_value.amount() {
                return Err(Error::validation(
                    "components",
                    format!(
                        "breakdown sums to {}, net value is {}",
                        sum.amount(),
                        net_value.amount()
                    ),
                ));
            }
        }

        Ok(Self {
            net_value,
            components,
            as_of,
        })
    }

    /// Net value of the instrument
    pub fn net_value(&self) -> &Money {
        &self.net_value
    }

    /// Component breakdown by name
    pub fn components(&self) -> &BTreeMap<String, Money> {
        &self.components
    }

    /// Valuation as-of time
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }
}

/// A single portfolio position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Held instrument
    pub instrument: SecurityId,
    /// Signed quantity held
    pub quantity: Decimal,
}

/// Portfolio handed to a risk model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Positions in the portfolio
    pub positions: Vec<Position>,
}

/// Confidence and horizon parameters for a value-at-risk request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParams {
    confidence_level: Decimal,
    horizon_days: u32,
}

impl RiskParams {
    /// Create parameters; the level must lie in the open (0, 1) and the
    /// horizon must be at least one day
    pub fn new(confidence_level: Decimal, horizon_days: u32) -> Result<Self> {
        if confidence_level <= Decimal::ZERO || confidence_level >= Decimal::ONE {
            return Err(Error::validation(
                "confidence_level",
                format!("{confidence_level} is outside the open interval (0, 1)"),
            ));
        }
        if horizon_days == 0 {
            return Err(Error::validation("horizon_days", "must be at least 1"));
        }
        Ok(Self {
            confidence_level,
            horizon_days,
        })
    }

    /// Confidence level in (0, 1)
    pub fn confidence_level(&self) -> Decimal {
        self.confidence_level
    }

    /// Horizon in days
    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }
}

/// Value-at-risk result
///
/// Both tail measures are mandatory: VaR alone hides the shape of the
/// tail beyond the quantile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    value_at_risk: Money,
    expected_shortfall: Money,
    params: RiskParams,
}

impl RiskResult {
    /// Create a risk result; both amounts must share one currency
    pub fn new(value_at_risk: Money, expected_shortfall: Money, params: RiskParams) -> Result<Self> {
        if value_at_risk.currency() != expected_shortfall.currency() {
            return Err(Error::validation(
                "expected_shortfall",
                format!(
                    "expected shortfall in {}, VaR in {}",
                    expected_shortfall.currency(),
                    value_at_risk.currency()
                ),
            ));
        }
        Ok(Self {
            value_at_risk,
            expected_shortfall,
            params,
        })
    }

    /// Value at risk at the requested confidence level
    pub fn value_at_risk(&self) -> &Money {
        &self.value_at_risk
    }

    /// Expected shortfall beyond the VaR quantile
    pub fn expected_shortfall(&self) -> &Money {
        &self.expected_shortfall
    }

    /// Parameters the result was computed under
    pub fn params(&self) -> RiskParams {
        self.params
    }
}
