//! Money market deposit.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Tenor;
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    simple_rate_knot, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// A deposit paying simple interest over `[start, maturity]`.
///
/// The implied quote is the simple rate between the two discount factors:
///
/// ```text
/// rate = (DF(start) / DF(maturity) - 1) / tau
/// ```
///
/// so once `DF(start)` is known the maturity knot has a closed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    id: String,
    start: Date,
    maturity: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit with ACT/360 accrual.
    #[must_use]
    pub fn new(id: impl Into<String>, start: Date, maturity: Date, rate: f64) -> Self {
        Self {
            id: id.into(),
            start,
            maturity,
            rate,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Creates a deposit running `tenor` from `start`.
    ///
    /// # Errors
    ///
    /// Fails if the maturity date is out of range.
    pub fn from_tenor(id: impl Into<String>, start: Date, tenor: Tenor, rate: f64) -> CurveResult<Self> {
        Ok(Self::new(id, start, tenor.advance(start)?, rate))
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Accrual start date.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Quoted simple rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Accrual day count.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

impl HasMaturity for Deposit {
    fn maturity(&self) -> Date {
        self.maturity
    }
}

impl HasMarketQuote for Deposit {
    fn market_quote(&self) -> f64 {
        self.rate
    }
}

impl ComputesImpliedQuote for Deposit {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        curve.forward_rate(self.start, self.maturity, self.day_count)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::ClosedForm
    }

    fn closed_form_value(&self, curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        simple_rate_knot(curve, self.start, self.maturity, self.rate, self.day_count)
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        (self.start != base_date).then_some(self.start)
    }
}

impl PriceableAsset for Deposit {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::Deposit
    }
}
