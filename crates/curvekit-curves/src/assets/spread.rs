//! Simple-rate spreads over a base curve.

use std::sync::Arc;

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Tenor;
use curvekit_core::Date;

use super::{
    simple_rate_knot, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// A simple rate over `[start, maturity]` quoted as a spread over the same
/// period's forward rate on a finished base curve.
///
/// The curve being built carries the all-in rate:
///
/// ```text
/// spread = F_built(start, maturity) - F_base(start, maturity)
/// ```
///
/// so, as for a [`Deposit`](super::Deposit), the maturity knot has a closed
/// form once `DF(start)` is known.
#[derive(Debug, Clone)]
pub struct RateSpread {
    id: String,
    start: Date,
    maturity: Date,
    spread: f64,
    day_count: DayCountConvention,
    base: Arc<dyn CurveView>,
}

impl RateSpread {
    /// Creates a spread with ACT/360 accrual over `base`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        base: Arc<dyn CurveView>,
        start: Date,
        maturity: Date,
        spread: f64,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            maturity,
            spread,
            day_count: DayCountConvention::Act360,
            base,
        }
    }

    /// Creates a spread running `tenor` from `start`.
    ///
    /// # Errors
    ///
    /// Fails if the maturity date is out of range.
    pub fn from_tenor(
        id: impl Into<String>,
        base: Arc<dyn CurveView>,
        start: Date,
        tenor: Tenor,
        spread: f64,
    ) -> CurveResult<Self> {
        Ok(Self::new(id, base, start, tenor.advance(start)?, spread))
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

    /// Quoted spread, as a decimal rate.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// The curve the spread is quoted over.
    #[must_use]
    pub fn base_curve(&self) -> &dyn CurveView {
        self.base.as_ref()
    }

    /// Forward rate of the base curve over the accrual period.
    ///
    /// # Errors
    ///
    /// Propagates base curve query errors.
    pub fn base_rate(&self) -> CurveResult<f64> {
        self.base.forward_rate(self.start, self.maturity, self.day_count)
    }
}

impl HasMaturity for RateSpread {
    fn maturity(&self) -> Date {
        self.maturity
    }
}

impl HasMarketQuote for RateSpread {
    fn market_quote(&self) -> f64 {
        self.spread
    }
}

impl ComputesImpliedQuote for RateSpread {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        Ok(curve.forward_rate(self.start, self.maturity, self.day_count)? - self.base_rate()?)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::ClosedForm
    }

    fn closed_form_value(&self, curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        let base_rate = match self.base_rate() {
            Ok(rate) => rate,
            Err(e) => return Some(Err(e)),
        };
        simple_rate_knot(curve, self.start, self.maturity, base_rate + self.spread, self.day_count)
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        (self.start != base_date).then_some(self.start)
    }
}

impl PriceableAsset for RateSpread {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::RateSpread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::InterpolatedSpace;
    use crate::term_curve::{TermCurve, TermPoint};
    use crate::value_type::CurveValueType;
    use approx::assert_relative_eq;
    use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};

    fn base() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    fn flat_curve(rate: f64) -> Arc<dyn CurveView> {
        let points = [0, 365, 730].map(|days| {
            TermPoint::new(base().add_days(days), (-rate * days as f64 / 365.0).exp())
        });
        let space = InterpolatedSpace::new(
            TermCurve::new(CurveValueType::DiscountFactor, points),
            base(),
            DayCountConvention::Act365Fixed,
            InterpolationMethod::LogLinear,
            Extrapolation::Linear,
        )
        .unwrap();
        Arc::new(space)
    }

    #[test]
    fn test_zero_spread_over_itself() {
        let curve = flat_curve(0.04);
        let spread = RateSpread::new("S", curve.clone(), base(), base().add_days(365), 0.0);
        assert_relative_eq!(spread.implied_quote(curve.as_ref()).unwrap(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_spread_is_difference_of_forwards() {
        let base_curve = flat_curve(0.03);
        let built = flat_curve(0.04);
        let spread = RateSpread::new("S", base_curve.clone(), base(), base().add_days(365), 0.0)
            .with_day_count(DayCountConvention::Act365Fixed);

        let expected = (0.04f64.exp() - 1.0) - (0.03f64.exp() - 1.0);
        assert_relative_eq!(spread.base_rate().unwrap(), 0.03f64.exp() - 1.0, epsilon = 1e-12);
        assert_relative_eq!(spread.implied_quote(built.as_ref()).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_start_reads_curve_at_start() {
        let spread = RateSpread::new("S", flat_curve(0.03), base().add_days(90), base().add_days(365), 0.001);
        assert_eq!(spread.earliest_curve_date(base()), Some(base().add_days(90)));
        assert_eq!(spread.family().to_string(), "RateSpread");
    }
}
