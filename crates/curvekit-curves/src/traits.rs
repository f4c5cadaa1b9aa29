//! The read-only view priceable assets use to query a curve.
//!
//! Both finished curves ([`InterpolatedSpace`](crate::space::InterpolatedSpace))
//! and the partial curves a bootstrapper holds while solving implement
//! [`CurveView`], so an asset computes its model-implied quote the same way
//! during and after the build.

use std::fmt;

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::rates::simple_forward_rate;
use curvekit_core::Date;

use crate::error::CurveResult;
use crate::value_type::CurveValueType;

/// Read access to a curve by date.
///
/// Implementors provide values in the curve's own value space; discount
/// factors and forward rates are derived through the [`CurveValueType`].
pub trait CurveView: Send + Sync + fmt::Debug {
    /// The date at which `time` is zero.
    fn base_date(&self) -> Date;

    /// Day count mapping dates to times.
    fn day_count(&self) -> DayCountConvention;

    /// Kind of value the curve stores.
    fn value_type(&self) -> CurveValueType;

    /// Last knot date, or `None` for a curve without knots.
    fn max_date(&self) -> Option<Date>;

    /// Curve value at `date`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` outside the knots when extrapolation is disabled.
    fn value(&self, date: Date) -> CurveResult<f64>;

    /// Signed year fraction from the base date to `date`.
    fn time(&self, date: Date) -> f64 {
        self.day_count().year_fraction_f64(self.base_date(), date)
    }

    /// Returns true if `date` lies on or before the last knot, or on the base
    /// date.
    fn covers(&self, date: Date) -> bool {
        date == self.base_date() || self.max_date().is_some_and(|last| date <= last)
    }

    /// Discount factor at `date`. The base date discounts at `1.0`.
    ///
    /// # Errors
    ///
    /// `IncompatibleValueType` unless the curve stores discount factors or
    /// zero rates.
    fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        let value_type = self.value_type();
        let t = self.time(date);
        if t == 0.0 {
            return value_type.to_discount_factor(1.0, 0.0);
        }
        value_type.to_discount_factor(self.value(date)?, t)
    }

    /// Simple forward rate between `start` and `end` with accrual measured by
    /// `day_count`.
    ///
    /// # Errors
    ///
    /// Propagates discount factor errors; `ArithmeticDomain` for a zero
    /// accrual period.
    fn forward_rate(&self, start: Date, end: Date, day_count: DayCountConvention) -> CurveResult<f64> {
        let tau = day_count.year_fraction_f64(start, end);
        let df_start = self.discount_factor(start)?;
        let df_end = self.discount_factor(end)?;
        Ok(simple_forward_rate(df_start, df_end, tau)?)
    }
}
