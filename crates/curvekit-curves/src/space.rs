//! Interpolated, queryable curves.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod, Interpolator};

use crate::error::{CurveError, CurveResult};
use crate::term_curve::TermCurve;
use crate::traits::CurveView;
use crate::value_type::CurveValueType;

/// A term curve wrapped in an interpolator for arbitrary-date queries.
///
/// Knot dates are mapped to abscissas with the day count from the base
/// date. A query on a knot date returns the stored value exactly. The space
/// is immutable once built and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use curvekit_core::daycounts::DayCountConvention;
/// use curvekit_core::Date;
/// use curvekit_curves::prelude::*;
/// use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
///
/// let base = Date::from_ymd(2025, 1, 1).unwrap();
/// let curve = TermCurve::new(
///     CurveValueType::DiscountFactor,
///     [TermPoint::new(base, 1.0), TermPoint::new(base.add_days(365), 0.95)],
/// );
/// let space = InterpolatedSpace::new(
///     curve,
///     base,
///     DayCountConvention::Act365Fixed,
///     InterpolationMethod::LogLinear,
///     Extrapolation::None,
/// )
/// .unwrap();
/// assert_eq!(space.value(base.add_days(365)).unwrap(), 0.95);
/// assert!(space.value(base.add_days(400)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedSpace {
    base_date: Date,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    extrapolation: Extrapolation,
    curve: TermCurve,
    interpolator: Box<dyn Interpolator>,
}

impl InterpolatedSpace {
    /// Wraps `curve` for querying.
    ///
    /// # Errors
    ///
    /// `InsufficientPoints` for fewer than two knots, `DuplicateAbscissa` if
    /// two dates map to the same time, or the interpolator's own validation
    /// error (e.g. non-positive values under log-linear).
    pub fn new(
        curve: TermCurve,
        base_date: Date,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        extrapolation: Extrapolation,
    ) -> CurveResult<Self> {
        if curve.len() < 2 {
            return Err(CurveError::insufficient_points(2, curve.len()));
        }
        let interpolator =
            method.build(curve.times(base_date, day_count), curve.values(), extrapolation)?;
        Ok(Self {
            base_date,
            day_count,
            method,
            extrapolation,
            curve,
            interpolator,
        })
    }

    /// Value at `t` years from the base date.
    ///
    /// # Errors
    ///
    /// `OutOfRange` beyond the knots when extrapolation is disabled.
    pub fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.value_at(t, self.extrapolation)?)
    }

    /// The same curve under a different extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(&self, extrapolation: Extrapolation) -> Self {
        let mut space = self.clone();
        space.extrapolation = extrapolation;
        space
    }

    /// The underlying knots.
    #[must_use]
    pub fn term_curve(&self) -> &TermCurve {
        &self.curve
    }

    /// Consumes the space, returning its knots.
    #[must_use]
    pub fn into_term_curve(self) -> TermCurve {
        self.curve
    }

    /// Interpolation method.
    #[must_use]
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Extrapolation policy.
    #[must_use]
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }
}

impl CurveView for InterpolatedSpace {
    fn base_date(&self) -> Date {
        self.base_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn value_type(&self) -> CurveValueType {
        self.curve.value_type()
    }

    fn max_date(&self) -> Option<Date> {
        self.curve.last().map(|p| p.date)
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        let t = self.time(date);
        Ok(self.interpolator.value_at(t, self.extrapolation)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_curve::TermPoint;
    use approx::assert_relative_eq;
    use curvekit_core::types::Compounding;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    fn zero_curve(rates: &[(i64, f64)]) -> TermCurve {
        TermCurve::new(
            CurveValueType::ZeroRate {
                compounding: Compounding::Simple,
            },
            rates.iter().map(|(d, r)| TermPoint::new(base().add_days(*d), *r)),
        )
    }

    fn space(curve: TermCurve, extrapolation: Extrapolation) -> InterpolatedSpace {
        InterpolatedSpace::new(
            curve,
            base(),
            DayCountConvention::Act365Fixed,
            InterpolationMethod::Linear,
            extrapolation,
        )
        .unwrap()
    }

    #[test]
    fn test_single_knot_rejected() {
        let err = InterpolatedSpace::new(
            zero_curve(&[(365, 0.05)]),
            base(),
            DayCountConvention::Act365Fixed,
            InterpolationMethod::Linear,
            Extrapolation::Linear,
        )
        .unwrap_err();
        assert_eq!(err, CurveError::InsufficientPoints { required: 2, got: 1 });
    }

    #[test]
    fn test_knots_exact_and_between() {
        let s = space(zero_curve(&[(365, 0.05), (730, 0.075)]), Extrapolation::Linear);
        assert_eq!(s.value(base().add_days(365)).unwrap(), 0.05);
        assert_eq!(s.value(base().add_days(730)).unwrap(), 0.075);
        assert_relative_eq!(s.value_at_time(1.5).unwrap(), 0.0625, epsilon = 1e-12);
        assert_relative_eq!(s.value_at_time(2.5).unwrap(), 0.0875, epsilon = 1e-12);
        assert_relative_eq!(s.value_at_time(3.0).unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_policy_switch() {
        let s = space(zero_curve(&[(365, 0.05), (730, 0.075)]), Extrapolation::None);
        let beyond = base().add_days(1000);
        assert!(matches!(s.value(beyond), Err(CurveError::OutOfRange { .. })));
        assert_eq!(
            s.with_extrapolation(Extrapolation::Flat).value(beyond).unwrap(),
            0.075
        );
    }

    #[test]
    fn test_discount_factor_from_zero_rates() {
        let s = space(zero_curve(&[(365, 0.05), (730, 0.05)]), Extrapolation::Linear);
        assert_eq!(s.discount_factor(base()).unwrap(), 1.0);
        assert_relative_eq!(
            s.discount_factor(base().add_days(730)).unwrap(),
            1.0 / 1.1,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InterpolatedSpace>();
    }
}
