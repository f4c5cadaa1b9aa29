//! Interest rate caps and floors, bootstrapped into caplet volatilities.

use std::fmt;
use std::sync::Arc;

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Frequency;
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    schedule_periods, AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity,
    PriceableAsset, SolveStrategy,
};
use crate::black::{black_price, OptionKind};
use crate::error::{CurveError, CurveResult};
use crate::traits::CurveView;

/// Cap or floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapFloorKind {
    /// Strip of caplets (calls on the forward rate).
    Cap,
    /// Strip of floorlets (puts on the forward rate).
    Floor,
}

impl CapFloorKind {
    fn option_kind(self) -> OptionKind {
        match self {
            CapFloorKind::Cap => OptionKind::Call,
            CapFloorKind::Floor => OptionKind::Put,
        }
    }
}

impl fmt::Display for CapFloorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapFloorKind::Cap => write!(f, "Cap"),
            CapFloorKind::Floor => write!(f, "Floor"),
        }
    }
}

/// A cap or floor quoted by its premium per unit notional.
///
/// Each period `[s, e]` of the strip is a caplet fixing at `s` and paying at
/// `e`, priced with Black's formula:
///
/// ```text
/// caplet = DF(e) * tau * Black(F(s, e), K, sigma(s), t(s))
/// ```
///
/// Forwards and discount factors come from the supplied discount curve; the
/// caplet volatilities `sigma(s)` are read from the volatility curve being
/// built. Caplets fixing on or before the base date are excluded.
#[derive(Clone)]
pub struct CapFloor {
    id: String,
    kind: CapFloorKind,
    start: Date,
    maturity: Date,
    strike: f64,
    premium: f64,
    frequency: Frequency,
    day_count: DayCountConvention,
    discount_curve: Arc<dyn CurveView>,
}

impl fmt::Debug for CapFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapFloor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("start", &self.start)
            .field("maturity", &self.maturity)
            .field("strike", &self.strike)
            .field("premium", &self.premium)
            .finish_non_exhaustive()
    }
}

impl CapFloor {
    /// Creates a quarterly ACT/360 cap or floor.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: CapFloorKind,
        start: Date,
        maturity: Date,
        strike: f64,
        premium: f64,
        discount_curve: Arc<dyn CurveView>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            start,
            maturity,
            strike,
            premium,
            frequency: Frequency::Quarterly,
            day_count: DayCountConvention::Act360,
            discount_curve,
        }
    }

    /// Sets the caplet frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Cap or floor.
    #[must_use]
    pub fn kind(&self) -> CapFloorKind {
        self.kind
    }

    /// Strike rate.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Premium of the strip given caplet volatilities from `vol_curve`.
    ///
    /// # Errors
    ///
    /// `Input` if no caplet fixes after the base date; otherwise propagates
    /// curve errors.
    pub fn premium_on(&self, vol_curve: &dyn CurveView) -> CurveResult<f64> {
        let base = vol_curve.base_date();
        let mut premium = 0.0;
        let mut caplets = 0;
        for (fixing, payment) in schedule_periods(self.start, self.maturity, self.frequency)? {
            if fixing <= base {
                continue;
            }
            let tau = self.day_count.year_fraction_f64(fixing, payment);
            let forward = self.discount_curve.forward_rate(fixing, payment, self.day_count)?;
            let df = self.discount_curve.discount_factor(payment)?;
            let vol = vol_curve.value(fixing)?;
            premium += df
                * tau
                * black_price(
                    self.kind.option_kind(),
                    forward,
                    self.strike,
                    vol,
                    vol_curve.time(fixing),
                );
            caplets += 1;
        }
        if caplets == 0 {
            return Err(CurveError::input(format!(
                "{} {} has no caplet fixing after {base}",
                self.kind, self.id
            )));
        }
        Ok(premium)
    }
}

impl HasMaturity for CapFloor {
    fn maturity(&self) -> Date {
        self.maturity
    }
}

impl HasMarketQuote for CapFloor {
    fn market_quote(&self) -> f64 {
        self.premium
    }
}

impl ComputesImpliedQuote for CapFloor {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        self.premium_on(curve)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::Iterative
    }

    fn earliest_curve_date(&self, base_date: Date) -> Option<Date> {
        schedule_periods(self.start, self.maturity, self.frequency)
            .ok()?
            .into_iter()
            .map(|(fixing, _)| fixing)
            .find(|&fixing| fixing > base_date)
    }
}

impl PriceableAsset for CapFloor {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::CapFloor
    }
}
