//! Pricing and risk model contracts
//!
//! Implementations live outside this workspace; these traits pin down
//! exactly what they consume and produce.

use crate::error::{PricingError, RiskError};
use crate::types::{
    InstrumentRef, MarketSnapshotRef, ModelConfigRef, Portfolio, RiskParams, RiskResult, Valuation,
};
use async_trait::async_trait;

/// Prices a single instrument against a market snapshot
#[async_trait]
pub trait PricingModel: Send + Sync {
    /// Produce a valuation or a typed pricing error
    async fn price(
        &self,
        instrument: &InstrumentRef,
        snapshot: &MarketSnapshotRef,
        config: &ModelConfigRef,
    ) -> Result<Valuation, PricingError>;
}

/// Computes tail risk for a portfolio
#[async_trait]
pub trait RiskModel: Send + Sync {
    /// Produce value-at-risk and expected shortfall, or a typed error
    async fn value_at_risk(
        &self,
        portfolio: &Portfolio,
        params: &RiskParams,
    ) -> Result<RiskResult, RiskError>;
}
