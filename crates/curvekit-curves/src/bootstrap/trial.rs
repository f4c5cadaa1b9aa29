//! Partial curves seen by assets while their knot is being solved.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_math::interpolation::{Extrapolation, Interpolator};

use super::BootstrapConfig;
use crate::error::{CurveError, CurveResult};
use crate::traits::CurveView;
use crate::value_type::CurveValueType;

#[derive(Debug)]
enum Shape {
    Empty,
    Flat(f64),
    Interpolated(Box<dyn Interpolator>),
}

/// The knots solved so far, optionally with a candidate for the knot under
/// search.
///
/// A single knot is flat everywhere. Extrapolation follows the configured
/// policy, except that a curve under construction always extrapolates flat
/// where the finished curve would refuse to.
#[derive(Debug)]
pub(crate) struct TrialCurve {
    base_date: Date,
    day_count: DayCountConvention,
    value_type: CurveValueType,
    extrapolation: Extrapolation,
    last_date: Option<Date>,
    shape: Shape,
}

impl TrialCurve {
    /// Builds a trial curve from knots in ascending date order.
    pub(crate) fn new(config: &BootstrapConfig, base_date: Date, knots: &[(Date, f64)]) -> CurveResult<Self> {
        let shape = match knots {
            [] => Shape::Empty,
            [(_, value)] => Shape::Flat(*value),
            _ => {
                let (xs, ys): (Vec<f64>, Vec<f64>) = knots
                    .iter()
                    .map(|(date, value)| (config.day_count.year_fraction_f64(base_date, *date), *value))
                    .unzip();
                Shape::Interpolated(config.method.build(xs, ys, config.extrapolation)?)
            }
        };
        let extrapolation = match config.extrapolation {
            Extrapolation::None => Extrapolation::Flat,
            other => other,
        };
        Ok(Self {
            base_date,
            day_count: config.day_count,
            value_type: config.value_type,
            extrapolation,
            last_date: knots.last().map(|(date, _)| *date),
            shape,
        })
    }
}

impl CurveView for TrialCurve {
    fn base_date(&self) -> Date {
        self.base_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn value_type(&self) -> CurveValueType {
        self.value_type
    }

    fn max_date(&self) -> Option<Date> {
        self.last_date
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        match &self.shape {
            Shape::Empty => Err(CurveError::input(format!(
                "no knot solved yet to value {date}"
            ))),
            Shape::Flat(value) => Ok(*value),
            Shape::Interpolated(interp) => Ok(interp.value_at(self.time(date), self.extrapolation)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_curve_still_discounts_base_date() {
        let trial = TrialCurve::new(&BootstrapConfig::discount_curve().with_anchor(None), base(), &[]).unwrap();
        assert_eq!(trial.discount_factor(base()).unwrap(), 1.0);
        assert!(trial.value(base().add_days(10)).is_err());
        assert!(!trial.covers(base().add_days(10)));
    }

    #[test]
    fn test_single_knot_is_flat() {
        let trial = TrialCurve::new(
            &BootstrapConfig::caplet_volatility_curve(),
            base(),
            &[(base().add_days(365), 0.25)],
        )
        .unwrap();
        assert_eq!(trial.value(base().add_days(30)).unwrap(), 0.25);
        assert_eq!(trial.value(base().add_days(3000)).unwrap(), 0.25);
    }

    #[test]
    fn test_disabled_extrapolation_is_flat_while_building() {
        let config = BootstrapConfig::caplet_volatility_curve().with_extrapolation(Extrapolation::None);
        let trial = TrialCurve::new(
            &config,
            base(),
            &[(base().add_days(365), 0.20), (base().add_days(730), 0.30)],
        )
        .unwrap();
        assert_eq!(trial.value(base().add_days(1000)).unwrap(), 0.30);
    }
}
