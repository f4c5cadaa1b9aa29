//! Priceable assets: market instruments the bootstrapper fits a curve to.
//!
//! Capabilities are split into small traits and combined in
//! [`PriceableAsset`]:
//!
//! - [`HasMaturity`]: the date the asset's knot is placed at
//! - [`HasMarketQuote`]: the observed quote
//! - [`ComputesImpliedQuote`]: the quote implied by a curve, plus how the
//!   bootstrapper should solve for the asset's knot
//!
//! # Available Assets
//!
//! - [`RateAsset`]: deposits, FRAs, rate futures and par swaps
//! - [`ExchangeFuture`]: exchange-traded futures quoted directly on a price curve
//! - [`CapFloor`]: cap or floor premiums, fitted on a caplet volatility curve
//! - [`RateSpread`]: simple rates quoted as a spread over a base curve
//! - [`FxForward`]: outright FX forwards quoted directly on an FX forward curve

mod cap_floor;
mod deposit;
mod exchange;
mod fra;
mod future;
mod fx;
mod rate;
mod spread;
mod swap;

pub use cap_floor::{CapFloor, CapFloorKind};
pub use deposit::Deposit;
pub use exchange::ExchangeFuture;
pub use fra::Fra;
pub use future::{ConvexityAdjustment, RateFuture};
pub use fx::FxForward;
pub use rate::RateAsset;
pub use spread::RateSpread;
pub use swap::Swap;

use std::fmt;

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::rates::simple_discount_factor;
use curvekit_core::types::Frequency;
use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;
use crate::traits::CurveView;

/// Family an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetFamily {
    /// Money market deposit.
    Deposit,
    /// Forward rate agreement.
    Fra,
    /// Interest rate future.
    RateFuture,
    /// Fixed-for-floating par swap.
    Swap,
    /// Exchange-traded future on a price curve.
    ExchangeFuture,
    /// Interest rate cap or floor.
    CapFloor,
    /// Simple rate quoted as a spread over a base curve.
    RateSpread,
    /// Outright FX forward.
    FxForward,
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetFamily::Deposit => "Deposit",
            AssetFamily::Fra => "FRA",
            AssetFamily::RateFuture => "Future",
            AssetFamily::Swap => "Swap",
            AssetFamily::ExchangeFuture => "ExchangeFuture",
            AssetFamily::CapFloor => "CapFloor",
            AssetFamily::RateSpread => "RateSpread",
            AssetFamily::FxForward => "FxForward",
        };
        write!(f, "{name}")
    }
}

/// How the bootstrapper obtains an asset's knot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStrategy {
    /// The market quote is the knot value.
    DirectQuote,
    /// A closed form exists once the asset's start is covered by earlier knots.
    ClosedForm,
    /// The knot is found with a root finder.
    Iterative,
}

/// An asset with a maturity date.
pub trait HasMaturity {
    /// Date of the asset's knot.
    fn maturity(&self) -> Date;
}

/// An asset with an observed market quote.
pub trait HasMarketQuote {
    /// The quote, in the asset's own units (rate, price or premium).
    fn market_quote(&self) -> f64;
}

/// An asset that can compute its quote from a curve.
pub trait ComputesImpliedQuote {
    /// The quote implied by `curve`.
    ///
    /// # Errors
    ///
    /// Propagates curve query and domain errors.
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64>;

    /// How the bootstrapper should solve for this asset's knot.
    fn solve_strategy(&self) -> SolveStrategy;

    /// Knot value at the maturity that reprices the asset exactly, given the
    /// knots already in `curve`.
    ///
    /// Returns `None` when no closed form applies to the current curve.
    fn closed_form_value(&self, _curve: &dyn CurveView) -> Option<CurveResult<f64>> {
        None
    }

    /// Earliest date other than `base_date` at which the implied quote reads
    /// the curve being built.
    ///
    /// `None` when the quote reads the curve only at the maturity.
    fn earliest_curve_date(&self, _base_date: Date) -> Option<Date> {
        None
    }
}

/// An instrument the bootstrapper can fit a curve to.
pub trait PriceableAsset:
    HasMaturity + HasMarketQuote + ComputesImpliedQuote + Send + Sync + fmt::Debug
{
    /// Identifier used in logs, reports and errors.
    fn id(&self) -> &str;

    /// The asset family.
    fn family(&self) -> AssetFamily;
}

/// Knot value at `end` for a simple `rate` accruing from `start`.
///
/// `DF(end) = DF(start) / (1 + rate * tau)`, converted into the curve's value
/// space. `None` when `start` lies beyond the curve's knots.
pub(crate) fn simple_rate_knot(
    curve: &dyn CurveView,
    start: Date,
    end: Date,
    rate: f64,
    day_count: DayCountConvention,
) -> Option<CurveResult<f64>> {
    if !curve.covers(start) {
        return None;
    }
    let solve = || -> CurveResult<f64> {
        let tau = day_count.year_fraction_f64(start, end);
        let df_end = curve.discount_factor(start)? * simple_discount_factor(rate, tau)?;
        curve.value_type().from_discount_factor(df_end, curve.time(end))
    };
    Some(solve())
}

/// Period end dates rolled backwards from `maturity` until `start`.
///
/// A short first period absorbs any remainder.
pub(crate) fn backward_schedule(
    start: Date,
    maturity: Date,
    frequency: Frequency,
) -> CurveResult<Vec<Date>> {
    let months = frequency.months_per_period() as i32;
    let mut dates = vec![maturity];
    for k in 1.. {
        let date = maturity.add_months(-months * k)?;
        if date <= start {
            break;
        }
        dates.push(date);
    }
    dates.reverse();
    Ok(dates)
}

/// `(period start, period end)` pairs of a backward schedule.
pub(crate) fn schedule_periods(
    start: Date,
    maturity: Date,
    frequency: Frequency,
) -> CurveResult<Vec<(Date, Date)>> {
    let ends = backward_schedule(start, maturity, frequency)?;
    let starts = std::iter::once(start).chain(ends.iter().copied());
    Ok(starts.zip(ends.iter().copied()).collect())
}
