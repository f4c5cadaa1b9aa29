//! Interest rate futures.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    simple_rate_knot, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// Gap between the futures rate and the forward rate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ConvexityAdjustment {
    /// Futures rate equals the forward rate.
    #[default]
    None,
    /// A fixed spread, in rate units.
    Fixed(f64),
    /// Ho-Lee style adjustment `0.5 * sigma^2 * t1 * t2` for a short-rate
    /// volatility `sigma`.
    Volatility(f64),
}

impl ConvexityAdjustment {
    /// Adjustment for a period from `t1` to `t2` years.
    #[must_use]
    pub fn value(&self, t1: f64, t2: f64) -> f64 {
        match *self {
            ConvexityAdjustment::None => 0.0,
            ConvexityAdjustment::Fixed(spread) => spread,
            ConvexityAdjustment::Volatility(sigma) => 0.5 * sigma * sigma * t1 * t2,
        }
    }
}

/// A future on a simple rate over `[start, end]`, quoted as a price
/// `100 * (1 - rate)`.
///
/// ```text
/// forward = (100 - price) / 100 - convexity_adjustment
/// ```
///
/// Bootstrapped like an FRA on that forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFuture {
    id: String,
    start: Date,
    end: Date,
    price: f64,
    day_count: DayCountConvention,
    convexity: ConvexityAdjustment,
}

impl RateFuture {
    /// Creates a future with ACT/360 accrual and no convexity adjustment.
    #[must_use]
    pub fn new(id: impl Into<String>, start: Date, end: Date, price: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            price,
            day_count: DayCountConvention::Act360,
            convexity: ConvexityAdjustment::None,
        }
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the convexity adjustment.
    #[must_use]
    pub fn with_convexity_adjustment(mut self, convexity: ConvexityAdjustment) -> Self {
        self.convexity = convexity;
        self
    }

    /// Quoted price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Rate implied by the price, before convexity adjustment.
    #[must_use]
    pub fn futures_rate(&self) -> f64 {
        (100.0 - self.price) / 100.0
    }

    fn adjustment(&self, curve: &dyn CurveView) -> f64 {
        self.convexity
            .value(curve.time(self.start), curve.time(self.end))
    }
}

impl HasMaturity for RateFuture {
    fn maturity(&self) -> Date {
        self.end
    }
}

impl HasMarketQuote for RateFuture {
    fn market_quote(&self) -> f64 {
        self.price
    }
}

impl ComputesImpliedQuote for RateFuture {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        let forward = curve.forward_rate(self.start, self.end, self.day_count)?;
        Ok(100.0 * (1.0 - (forward + self.adjustment(curve))))
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::ClosedForm
    }

    fn closed_form_value(&self, curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        let forward = self.futures_rate() - self.adjustment(curve);
        simple_rate_knot(curve, self.start, self.end, forward, self.day_count)
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        (self.start != base_date).then_some(self.start)
    }
}

impl PriceableAsset for RateFuture {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::RateFuture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volatility_adjustment() {
        let adj = ConvexityAdjustment::Volatility(0.01);
        assert_relative_eq!(adj.value(1.0, 1.25), 0.5 * 1e-4 * 1.25, epsilon = 1e-18);
        assert_eq!(ConvexityAdjustment::None.value(1.0, 1.25), 0.0);
        assert_eq!(ConvexityAdjustment::Fixed(0.0002).value(3.0, 4.0), 0.0002);
    }

    #[test]
    fn test_futures_rate() {
        let d = Date::from_ymd(2025, 3, 19).unwrap();
        let fut = RateFuture::new("SFRH5", d, d.add_days(91), 95.25);
        assert_relative_eq!(fut.futures_rate(), 0.0475, epsilon = 1e-15);
    }
}
