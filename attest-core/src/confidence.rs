//! Epistemic confidence classification
//!
//! Closed three-variant model of how a value was obtained. Each variant
//! carries its own construction invariants; an instance that exists is
//! valid by construction.

use crate::canonical::{CanonicalValue, Canonicalize};
use crate::decimal::{self, PositiveAmount};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed fact from an authoritative venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firm {
    source: String,
    timestamp: DateTime<Utc>,
    reference: String,
}

impl Firm {
    /// Create firm confidence; source and reference must be non-empty
    pub fn new(
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
        reference: impl Into<String>,
    ) -> Result<Self> {
        let source = source.into();
        let reference = reference.into();
        if source.trim().is_empty() {
            return Err(Error::validation("source", "must be non-empty"));
        }
        if reference.trim().is_empty() {
            return Err(Error::validation("reference", "must be non-empty"));
        }
        Ok(Self {
            source,
            timestamp,
            reference,
        })
    }

    /// Observing venue
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Observation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Venue-side reference for the observation
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// Condition attached to a quoted price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteCondition {
    /// Indicative only, not dealable
    Indicative,
    /// Dealable at the quoted levels
    Firm,
    /// Response to a request for quote
    Rfq,
}

impl QuoteCondition {
    fn tag(&self) -> &'static str {
        match self {
            QuoteCondition::Indicative => "indicative",
            QuoteCondition::Firm => "firm",
            QuoteCondition::Rfq => "rfq",
        }
    }
}

/// Two-sided market quote
///
/// A negative spread signals corrupted market data and is rejected at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quoted {
    bid: Decimal,
    ask: Decimal,
    venue: String,
    size: Option<PositiveAmount>,
    condition: QuoteCondition,
}

impl Quoted {
    /// Create quoted confidence; fails when `bid > ask` or venue is empty
    pub fn new(
        bid: Decimal,
        ask: Decimal,
        venue: impl Into<String>,
        size: Option<PositiveAmount>,
        condition: QuoteCondition,
    ) -> Result<Self> {
        let venue = venue.into();
        if venue.trim().is_empty() {
            return Err(Error::validation("venue", "must be non-empty"));
        }
        if bid > ask {
            return Err(Error::validation(
                "spread",
                format!("negative spread: bid {bid} > ask {ask}"),
            ));
        }
        Ok(Self {
            bid,
            ask,
            venue,
            size,
            condition,
        })
    }

    /// Bid price
    pub fn bid(&self) -> Decimal {
        self.bid
    }

    /// Ask price
    pub fn ask(&self) -> Decimal {
        self.ask
    }

    /// Quoting venue
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Quoted size, when the venue disclosed one
    pub fn size(&self) -> Option<PositiveAmount> {
        self.size
    }

    /// Quote condition
    pub fn condition(&self) -> QuoteCondition {
        self.condition
    }

    /// Midpoint of bid and ask
    pub fn mid(&self) -> Result<Decimal> {
        decimal::checked_div(decimal::checked_add(self.bid, self.ask)?, Decimal::from(2))
    }

    /// Quoted spread, non-negative by construction
    pub fn spread(&self) -> Result<Decimal> {
        decimal::checked_sub(self.ask, self.bid)
    }

    /// Half the quoted spread
    pub fn half_spread(&self) -> Result<Decimal> {
        decimal::checked_div(self.spread()?, Decimal::from(2))
    }
}

/// Model-derived value with calibration evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    method: String,
    config_ref: String,
    fit_quality: BTreeMap<String, Decimal>,
    confidence_interval: Option<(Decimal, Decimal)>,
    confidence_level: Option<Decimal>,
}

impl Derived {
    /// Create derived confidence
    ///
    /// An uncalibrated model cannot attest: empty fit-quality is a
    /// calibration failure. The confidence interval and level travel
    /// together or not at all, and the level must lie in the open (0, 1).
    pub fn new(
        method: impl Into<String>,
        config_ref: impl Into<String>,
        fit_quality: BTreeMap<String, Decimal>,
        confidence_interval: Option<(Decimal, Decimal)>,
        confidence_level: Option<Decimal>,
    ) -> Result<Self> {
        let method = method.into();
        let config_ref = config_ref.into();
        if method.trim().is_empty() {
            return Err(Error::validation("method", "must be non-empty"));
        }
        if config_ref.trim().is_empty() {
            return Err(Error::validation("config_ref", "must be non-empty"));
        }
        if fit_quality.is_empty() {
            return Err(Error::Calibration(format!(
                "model {method} has no fit-quality metrics"
            )));
        }
        match (&confidence_interval, &confidence_level) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::validation(
                    "confidence_interval",
                    "interval and level must both be present or both absent",
                ));
            }
            (Some((lower, upper)), Some(level)) => {
                if lower > upper {
                    return Err(Error::validation(
                        "confidence_interval",
                        format!("lower bound {lower} exceeds upper bound {upper}"),
                    ));
                }
                if *level <= Decimal::ZERO || *level >= Decimal::ONE {
                    return Err(Error::validation(
                        "confidence_level",
                        format!("{level} is outside the open interval (0, 1)"),
                    ));
                }
            }
            (None, None) => {}
        }
        Ok(Self {
            method,
            config_ref,
            fit_quality,
            confidence_interval,
            confidence_level,
        })
    }

    /// Model or methodology name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Reference to the model configuration used
    pub fn config_ref(&self) -> &str {
        &self.config_ref
    }

    /// Calibration metrics by name
    pub fn fit_quality(&self) -> &BTreeMap<String, Decimal> {
        &self.fit_quality
    }

    /// Confidence interval, present iff a level is present
    pub fn confidence_interval(&self) -> Option<(Decimal, Decimal)> {
        self.confidence_interval
    }

    /// Confidence level in (0, 1), present iff an interval is present
    pub fn confidence_level(&self) -> Option<Decimal> {
        self.confidence_level
    }
}

/// Closed epistemic classification of how a value was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Confidence {
    /// Observed fact from an authoritative venue
    Firm(Firm),
    /// Two-sided market quote
    Quoted(Quoted),
    /// Model-derived value
    Derived(Derived),
}

impl Canonicalize for Confidence {
    fn type_tag(&self) -> &'static str {
        match self {
            Confidence::Firm(_) => "confidence.firm",
            Confidence::Quoted(_) => "confidence.quoted",
            Confidence::Derived(_) => "confidence.derived",
        }
    }

    fn to_canonical(&self) -> Result<CanonicalValue> {
        let value = match self {
            Confidence::Firm(firm) => CanonicalValue::record(
                self.type_tag(),
                [
                    ("source", CanonicalValue::Text(firm.source.clone())),
                    ("timestamp", CanonicalValue::Timestamp(firm.timestamp)),
                    ("reference", CanonicalValue::Text(firm.reference.clone())),
                ],
            ),
            Confidence::Quoted(quoted) => {
                let mut fields = vec![
                    ("bid", CanonicalValue::Decimal(quoted.bid)),
                    ("ask", CanonicalValue::Decimal(quoted.ask)),
                    ("venue", CanonicalValue::Text(quoted.venue.clone())),
                    (
                        "condition",
                        CanonicalValue::Text(quoted.condition.tag().to_string()),
                    ),
                ];
                if let Some(size) = quoted.size {
                    fields.push(("size", CanonicalValue::Decimal(size.get())));
                }
                CanonicalValue::record(self.type_tag(), fields)
            }
            Confidence::Derived(derived) => {
                let fit = derived
                    .fit_quality
                    .iter()
                    .map(|(k, v)| (k.clone(), CanonicalValue::Decimal(*v)))
                    .collect();
                let mut fields = vec![
                    ("method", CanonicalValue::Text(derived.method.clone())),
                    ("config_ref", CanonicalValue::Text(derived.config_ref.clone())),
                    ("fit_quality", CanonicalValue::Map(fit)),
                ];
                if let Some((lower, upper)) = derived.confidence_interval {
                    fields.push((
                        "confidence_interval",
                        CanonicalValue::Sequence(vec![
                            CanonicalValue::Decimal(lower),
                            CanonicalValue::Decimal(upper),
                        ]),
                    ));
                }
                if let Some(level) = derived.confidence_level {
                    fields.push(("confidence_level", CanonicalValue::Decimal(level)));
                }
                CanonicalValue::record(self.type_tag(), fields)
            }
        };
        Ok(value)
    }
}
