//! The interest rate asset family.

use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    AssetFamily, ComputesImpliedQuote, Deposit, Fra, HasMarketQuote, HasMaturity, PriceableAsset,
    RateFuture, SolveStrategy, Swap,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// Any of the linear rate instruments used to build discount and zero curves.
///
/// # Example
///
/// ```rust
/// use curvekit_core::Date;
/// use curvekit_curves::assets::{Deposit, HasMaturity, RateAsset};
///
/// let spot = Date::from_ymd(2025, 1, 2).unwrap();
/// let asset: RateAsset = Deposit::new("DEP-3M", spot, spot.add_days(91), 0.045).into();
/// assert_eq!(asset.maturity(), spot.add_days(91));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RateAsset {
    /// Money market deposit.
    Deposit(Deposit),
    /// Forward rate agreement.
    Fra(Fra),
    /// Interest rate future.
    Future(RateFuture),
    /// Par swap.
    Swap(Swap),
}

impl RateAsset {
    fn inner(&self) -> &dyn PriceableAsset {
        match self {
            RateAsset::Deposit(a) => a,
            RateAsset::Fra(a) => a,
            RateAsset::Future(a) => a,
            RateAsset::Swap(a) => a,
        }
    }
}

impl From<Deposit> for RateAsset {
    fn from(asset: Deposit) -> Self {
        RateAsset::Deposit(asset)
    }
}

impl From<Fra> for RateAsset {
    fn from(asset: Fra) -> Self {
        RateAsset::Fra(asset)
    }
}

impl From<RateFuture> for RateAsset {
    fn from(asset: RateFuture) -> Self {
        RateAsset::Future(asset)
    }
}

impl From<Swap> for RateAsset {
    fn from(asset: Swap) -> Self {
        RateAsset::Swap(asset)
    }
}

impl HasMaturity for RateAsset {
    fn maturity(&self) -> Date {
        self.inner().maturity()
    }
}

impl HasMarketQuote for RateAsset {
    fn market_quote(&self) -> f64 {
        self.inner().market_quote()
    }
}

impl ComputesImpliedQuote for RateAsset {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        self.inner().implied_quote(curve)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        self.inner().solve_strategy()
    }

    fn closed_form_value(&self, curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        self.inner().closed_form_value(curve)
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        self.inner().earliest_curve_date(base_date)
    }
}

impl PriceableAsset for RateAsset {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn family(&self) -> AssetFamily {
        self.inner().family()
    }
}
