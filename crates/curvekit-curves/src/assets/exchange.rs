//! Exchange-traded futures on a price curve.

use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity, PriceableAsset, SolveStrategy,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// A listed future whose published settlement price is the curve value at
/// its expiry.
///
/// Used for commodity and index price curves; no solving is involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeFuture {
    id: String,
    expiry: Date,
    price: f64,
}

impl ExchangeFuture {
    /// Creates a future settling at `price` on `expiry`.
    #[must_use]
    pub fn new(id: impl Into<String>, expiry: Date, price: f64) -> Self {
        Self {
            id: id.into(),
            expiry,
            price,
        }
    }
}

impl HasMaturity for ExchangeFuture {
    fn maturity(&self) -> Date {
        self.expiry
    }
}

impl HasMarketQuote for ExchangeFuture {
    fn market_quote(&self) -> f64 {
        self.price
    }
}

impl ComputesImpliedQuote for ExchangeFuture {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        curve.value(self.expiry)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::DirectQuote
    }
}

impl PriceableAsset for ExchangeFuture {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::ExchangeFuture
    }
}
