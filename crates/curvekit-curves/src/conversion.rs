//! Conversions between curve representations.
//!
//! - [`to_zero_curve`]: discount factors to zero rates
//! - [`to_discount_curve`]: zero rates back to discount factors
//! - [`to_forward_curve`]: discount curve to simple forwards over a tenor
//!
//! Conversions work knot by knot and keep the knot dates. Each checks the
//! input curve's [`CurveValueType`] first.
//!
//! A zero rate at the base date (`t == 0`) is undefined. [`to_zero_curve`]
//! copies the next knot's rate onto such a knot, so a discount curve
//! anchored at the base date converts without a gap.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::rates::simple_forward_rate;
use curvekit_core::types::{Compounding, Tenor};
use curvekit_core::Date;
use curvekit_math::interpolation::Extrapolation;

use crate::error::{CurveError, CurveResult};
use crate::space::InterpolatedSpace;
use crate::term_curve::{TermCurve, TermPoint};
use crate::traits::CurveView;
use crate::value_type::CurveValueType;

fn expect_value_type(curve: &TermCurve, expected: &str, ok: bool) -> CurveResult<()> {
    if ok {
        Ok(())
    } else {
        Err(CurveError::incompatible_value_type(
            expected,
            curve.value_type().to_string(),
        ))
    }
}

/// Converts a discount factor curve into zero rates.
///
/// # Errors
///
/// - `IncompatibleValueType` unless `curve` holds discount factors
/// - `ArithmeticDomain` for a non-positive discount factor, or when the
///   base-date knot has no later knot to copy from
///
/// # Example
///
/// ```rust
/// use curvekit_core::daycounts::DayCountConvention;
/// use curvekit_core::types::Compounding;
/// use curvekit_core::Date;
/// use curvekit_curves::conversion::to_zero_curve;
/// use curvekit_curves::prelude::*;
///
/// let base = Date::from_ymd(2025, 1, 1).unwrap();
/// let dfs = TermCurve::new(
///     CurveValueType::DiscountFactor,
///     [TermPoint::new(base, 1.0), TermPoint::new(base.add_days(365), 0.95)],
/// );
/// let zeros = to_zero_curve(&dfs, base, Compounding::Annual, DayCountConvention::Act365Fixed).unwrap();
/// let rates = zeros.values();
/// assert!((rates[1] - (1.0 / 0.95 - 1.0)).abs() < 1e-12);
/// assert_eq!(rates[0], rates[1]);
/// ```
pub fn to_zero_curve(
    curve: &TermCurve,
    base_date: Date,
    compounding: Compounding,
    day_count: DayCountConvention,
) -> CurveResult<TermCurve> {
    expect_value_type(
        curve,
        "DiscountFactor",
        curve.value_type() == CurveValueType::DiscountFactor,
    )?;

    let times = curve.times(base_date, day_count);
    let mut rates: Vec<Option<f64>> = Vec::with_capacity(curve.len());
    for (point, &t) in curve.points().iter().zip(&times) {
        if t == 0.0 {
            rates.push(None);
        } else {
            rates.push(Some(compounding.zero_rate(point.value, t)?));
        }
    }

    // Fill each base-date singularity from the next defined rate
    let mut points = Vec::with_capacity(curve.len());
    for (i, point) in curve.points().iter().enumerate() {
        let rate = match rates[i] {
            Some(rate) => rate,
            None => rates[i + 1..].iter().flatten().next().copied().ok_or_else(|| {
                CurveError::arithmetic_domain(format!(
                    "zero rate at {} (t = 0) has no later knot to copy from",
                    point.date
                ))
            })?,
        };
        points.push(TermPoint::new(point.date, rate));
    }

    Ok(TermCurve::new(CurveValueType::ZeroRate { compounding }, points))
}

/// Converts a zero rate curve into discount factors; the base date maps to
/// `1.0`.
///
/// The compounding is taken from the curve's value type.
///
/// # Errors
///
/// `IncompatibleValueType` unless `curve` holds zero rates, or a domain
/// error if a rate gives a non-positive discount factor.
pub fn to_discount_curve(
    curve: &TermCurve,
    base_date: Date,
    day_count: DayCountConvention,
) -> CurveResult<TermCurve> {
    let CurveValueType::ZeroRate { compounding } = curve.value_type() else {
        return Err(CurveError::incompatible_value_type(
            "ZeroRate",
            curve.value_type().to_string(),
        ));
    };

    let points = curve
        .points()
        .iter()
        .zip(curve.times(base_date, day_count))
        .map(|(point, t)| -> CurveResult<TermPoint> {
            Ok(TermPoint::new(point.date, compounding.discount_factor(point.value, t)?))
        })
        .collect::<CurveResult<Vec<_>>>()?;

    Ok(TermCurve::new(CurveValueType::DiscountFactor, points))
}

/// Simple forward rates over `tenor` starting at each knot of a discount
/// curve:
///
/// ```text
/// F(d) = (DF(d) / DF(d + tenor) - 1) / (t(d + tenor) - t(d))
/// ```
///
/// `DF(d + tenor)` is interpolated from `curve`, extrapolating linearly past
/// the last knot whatever the curve's own policy.
///
/// # Errors
///
/// `IncompatibleValueType` unless the curve implies discount factors;
/// domain errors from the forward formula.
pub fn to_forward_curve(curve: &InterpolatedSpace, tenor: Tenor) -> CurveResult<TermCurve> {
    let value_type = curve.value_type();
    if !value_type.implies_discounting() {
        return Err(CurveError::incompatible_value_type(
            "DiscountFactor or ZeroRate",
            value_type.to_string(),
        ));
    }

    let extended = curve.with_extrapolation(Extrapolation::Linear);
    let points = curve
        .term_curve()
        .points()
        .iter()
        .map(|point| -> CurveResult<TermPoint> {
            let end = tenor.advance(point.date)?;
            let tau = extended.time(end) - extended.time(point.date);
            let df_start = extended.discount_factor(point.date)?;
            let df_end = extended.discount_factor(end)?;
            Ok(TermPoint::new(point.date, simple_forward_rate(df_start, df_end, tau)?))
        })
        .collect::<CurveResult<Vec<_>>>()?;

    Ok(TermCurve::new(CurveValueType::ForwardRate { tenor }, points))
}
