//! Forward rate agreement.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    simple_rate_knot, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// A forward rate agreement on the simple rate over `[start, end]`.
///
/// Priced like a forward-starting deposit. The end knot has a closed form
/// once the curve covers `start`; otherwise it is solved iteratively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fra {
    id: String,
    start: Date,
    end: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Fra {
    /// Creates an FRA with ACT/360 accrual.
    #[must_use]
    pub fn new(id: impl Into<String>, start: Date, end: Date, rate: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            rate,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Start of the forward period.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Quoted forward rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl HasMaturity for Fra {
    fn maturity(&self) -> Date {
        self.end
    }
}

impl HasMarketQuote for Fra {
    fn market_quote(&self) -> f64 {
        self.rate
    }
}

impl ComputesImpliedQuote for Fra {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        curve.forward_rate(self.start, self.end, self.day_count)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::ClosedForm
    }

    fn closed_form_value(&self, curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        simple_rate_knot(curve, self.start, self.end, self.rate, self.day_count)
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        (self.start != base_date).then_some(self.start)
    }
}

impl PriceableAsset for Fra {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::Fra
    }
}
