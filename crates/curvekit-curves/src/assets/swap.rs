//! Single-curve fixed-for-floating par swap.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::{Frequency, Tenor};
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    schedule_periods, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::error::{CurveError, CurveResult};
use crate::traits::CurveView;

/// A par swap quoted by its fixed rate.
///
/// The fixed schedule is rolled backwards from maturity by the fixed
/// frequency. With the floating leg valued off the same curve:
///
/// ```text
/// par = (DF(start) - DF(maturity)) / sum(tau_i * DF(t_i))
/// ```
///
/// The annuity depends on knots between earlier pillars and the maturity, so
/// the maturity knot is always solved iteratively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    id: String,
    start: Date,
    maturity: Date,
    fixed_rate: f64,
    frequency: Frequency,
    day_count: DayCountConvention,
}

impl Swap {
    /// Creates a swap with semi-annual 30/360 fixed payments.
    #[must_use]
    pub fn new(id: impl Into<String>, start: Date, maturity: Date, fixed_rate: f64) -> Self {
        Self {
            id: id.into(),
            start,
            maturity,
            fixed_rate,
            frequency: Frequency::SemiAnnual,
            day_count: DayCountConvention::Thirty360US,
        }
    }

    /// Creates a swap running `tenor` from `start`.
    ///
    /// # Errors
    ///
    /// Fails if the maturity date is out of range.
    pub fn from_tenor(
        id: impl Into<String>,
        start: Date,
        tenor: Tenor,
        fixed_rate: f64,
    ) -> CurveResult<Self> {
        Ok(Self::new(id, start, tenor.advance(start)?, fixed_rate))
    }

    /// Sets the fixed leg frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the fixed leg day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Effective date.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Quoted fixed rate.
    #[must_use]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Fixed leg payment dates.
    ///
    /// # Errors
    ///
    /// Fails if a rolled date is out of range.
    pub fn payment_dates(&self) -> CurveResult<Vec<Date>> {
        Ok(schedule_periods(self.start, self.maturity, self.frequency)?
            .into_iter()
            .map(|(_, end)| end)
            .collect())
    }

    /// Fixed leg annuity `sum(tau_i * DF(t_i))` on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates discount factor errors.
    pub fn annuity(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        let mut annuity = 0.0;
        for (start, end) in schedule_periods(self.start, self.maturity, self.frequency)? {
            annuity += self.day_count.year_fraction_f64(start, end) * curve.discount_factor(end)?;
        }
        Ok(annuity)
    }
}

impl HasMaturity for Swap {
    fn maturity(&self) -> Date {
        self.maturity
    }
}

impl HasMarketQuote for Swap {
    fn market_quote(&self) -> f64 {
        self.fixed_rate
    }
}

impl ComputesImpliedQuote for Swap {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        let annuity = self.annuity(curve)?;
        if annuity.abs() < f64::EPSILON {
            return Err(CurveError::arithmetic_domain(format!(
                "swap {} has a zero annuity",
                self.id
            )));
        }
        let float_leg = curve.discount_factor(self.start)? - curve.discount_factor(self.maturity)?;
        Ok(float_leg / annuity)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::Iterative
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        if self.start != base_date {
            return Some(self.start);
        }
        schedule_periods(self.start, self.maturity, self.frequency)
            .ok()?
            .first()
            .map(|&(_, end)| end)
    }
}

impl PriceableAsset for Swap {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::Swap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_dates_semi_annual() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let swap = Swap::from_tenor("2Y", start, Tenor::years(2), 0.04).unwrap();
        let dates = swap.payment_dates().unwrap();
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], Date::from_ymd(2025, 7, 15).unwrap());
        assert_eq!(*dates.last().unwrap(), swap.maturity());
    }

    #[test]
    fn test_annual_frequency() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let swap = Swap::from_tenor("5Y", start, Tenor::years(5), 0.04)
            .unwrap()
            .with_frequency(Frequency::Annual);
        assert_eq!(swap.payment_dates().unwrap().len(), 5);
    }
}
