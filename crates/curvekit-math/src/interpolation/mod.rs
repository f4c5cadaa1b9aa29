//! Interpolation methods for curve and surface construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Linear between knots
//! - [`LogLinearInterpolator`]: Linear in `ln(y)`, for discount factors
//! - [`CubicSpline`]: Natural cubic spline (non-local)
//! - [`SurfaceInterpolator`]: Two-pass interpolation over a grid of rows
//!
//! All 1-D interpolators share the same contract:
//!
//! - abscissas are strictly ascending; duplicates fail with
//!   [`MathError::DuplicateAbscissa`](crate::MathError::DuplicateAbscissa)
//! - a query exactly on a knot returns the stored ordinate bit-for-bit
//! - outside `[x_min, x_max]` the [`Extrapolation`] policy decides: `None`
//!   fails with `OutOfRange`, `Linear` continues the boundary
//!   segment, `Flat` holds the boundary value
//!
//! Interpolators are immutable after construction and `Send + Sync`.

mod cubic_spline;
pub mod knots;
mod linear;
mod log_linear;
mod surface;

pub use cubic_spline::CubicSpline;
pub use knots::{Knots, Location};
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use surface::{Point2D, SurfaceInterpolator};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Behaviour of an interpolator outside its knot range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Fail with `OutOfRange`.
    #[default]
    None,
    /// Continue the boundary segment (in the interpolator's own space).
    Linear,
    /// Hold the boundary value.
    Flat,
}

impl Extrapolation {
    /// Returns true unless the policy is [`Extrapolation::None`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Extrapolation::None)
    }
}

impl From<bool> for Extrapolation {
    /// `true` allows linear continuation, `false` forbids extrapolation.
    fn from(allow: bool) -> Self {
        if allow {
            Extrapolation::Linear
        } else {
            Extrapolation::None
        }
    }
}

/// Trait for 1-D interpolation methods.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Returns the value at `x` under the given extrapolation policy.
    fn value_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64>;

    /// Returns the first derivative at `x` under the given policy.
    fn derivative_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64>;

    /// Default extrapolation policy of this instance.
    fn extrapolation(&self) -> Extrapolation;

    /// The knots the interpolator was built from.
    fn knots(&self) -> &Knots;

    /// Clones into a new boxed interpolator.
    fn box_clone(&self) -> Box<dyn Interpolator>;

    /// Value at `x` under the instance's default policy.
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.value_at(x, self.extrapolation())
    }

    /// Derivative at `x` under the instance's default policy.
    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.derivative_at(x, self.extrapolation())
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64 {
        self.knots().min_x()
    }

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64 {
        self.knots().max_x()
    }

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

impl Clone for Box<dyn Interpolator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Side of the knot range a query fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Below,
    Above,
}

/// A query resolved against knots and an extrapolation policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved {
    Knot(usize),
    Segment(usize),
    Flat(f64),
    Continue(Side),
}

pub(crate) fn resolve(knots: &Knots, x: f64, extrapolation: Extrapolation) -> MathResult<Resolved> {
    if !x.is_finite() {
        return Err(MathError::invalid_input(format!("cannot interpolate at {x}")));
    }
    let side = match knots.locate(x) {
        Location::Knot(i) => return Ok(Resolved::Knot(i)),
        Location::Inside(i) => return Ok(Resolved::Segment(i)),
        Location::Below => Side::Below,
        Location::Above => Side::Above,
    };
    match extrapolation {
        Extrapolation::None => Err(knots.out_of_range(x)),
        Extrapolation::Linear => Ok(Resolved::Continue(side)),
        Extrapolation::Flat => Ok(Resolved::Flat(match side {
            Side::Below => knots.ys()[0],
            Side::Above => knots.ys()[knots.len() - 1],
        })),
    }
}

/// Selectable interpolation algorithm.
///
/// Acts as the factory for boxed interpolators and is what configuration
/// files name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// [`LinearInterpolator`]
    #[default]
    Linear,
    /// [`LogLinearInterpolator`]
    LogLinear,
    /// [`CubicSpline`]
    CubicSpline,
}

impl InterpolationMethod {
    /// Builds an interpolator of this kind.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's validation errors.
    pub fn build(
        &self,
        xs: Vec<f64>,
        ys: Vec<f64>,
        extrapolation: Extrapolation,
    ) -> MathResult<Box<dyn Interpolator>> {
        Ok(match self {
            InterpolationMethod::Linear => {
                Box::new(LinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation))
            }
            InterpolationMethod::LogLinear => {
                Box::new(LogLinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation))
            }
            InterpolationMethod::CubicSpline => {
                Box::new(CubicSpline::new(xs, ys)?.with_extrapolation(extrapolation))
            }
        })
    }

    /// Returns true if a knot only influences its neighbouring segments.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, InterpolationMethod::CubicSpline)
    }

    /// Returns true if the method requires strictly positive ordinates.
    #[must_use]
    pub fn requires_positive(&self) -> bool {
        matches!(self, InterpolationMethod::LogLinear)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolationMethod::Linear => "Linear",
            InterpolationMethod::LogLinear => "LogLinear",
            InterpolationMethod::CubicSpline => "CubicSpline",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const METHODS: [InterpolationMethod; 3] = [
        InterpolationMethod::Linear,
        InterpolationMethod::LogLinear,
        InterpolationMethod::CubicSpline,
    ];

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.5_f64, 1.0, 2.0, 3.0, 5.0];
        let dfs: Vec<f64> = times.iter().map(|t| (-0.03 * t).exp()).collect();

        for method in METHODS {
            let interp = method
                .build(times.clone(), dfs.clone(), Extrapolation::None)
                .unwrap();
            for (t, df) in times.iter().zip(&dfs) {
                assert_eq!(interp.interpolate(*t).unwrap(), *df, "{method}");
            }
        }
    }

    #[test]
    fn test_duplicate_abscissa_rejected_by_every_method() {
        for method in METHODS {
            let err = method
                .build(vec![1.0, 2.0, 2.0], vec![1.0, 0.9, 0.8], Extrapolation::None)
                .unwrap_err();
            assert!(matches!(err, MathError::DuplicateAbscissa { .. }), "{method}");
        }
    }

    #[test]
    fn test_boxed_clone_behaves_identically() {
        let interp = InterpolationMethod::CubicSpline
            .build(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0], Extrapolation::Linear)
            .unwrap();
        let copy = interp.clone();
        assert_eq!(interp.interpolate(2.5).unwrap(), copy.interpolate(2.5).unwrap());
    }

    #[test]
    fn test_derivative_consistency() {
        let times = vec![0.5_f64, 1.0, 2.0, 3.0, 5.0];
        let dfs: Vec<f64> = times.iter().map(|t| (-0.03 * t).exp()).collect();
        for method in METHODS {
            let interp = method
                .build(times.clone(), dfs.clone(), Extrapolation::None)
                .unwrap();
            let h = 1e-6;
            let fd = (interp.interpolate(1.5 + h).unwrap() - interp.interpolate(1.5 - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(interp.derivative(1.5).unwrap(), fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_extrapolation_from_bool() {
        assert_eq!(Extrapolation::from(true), Extrapolation::Linear);
        assert_eq!(Extrapolation::from(false), Extrapolation::None);
        assert!(!Extrapolation::None.is_allowed());
    }

    #[test]
    fn test_locality() {
        assert!(InterpolationMethod::Linear.is_local());
        assert!(InterpolationMethod::LogLinear.is_local());
        assert!(!InterpolationMethod::CubicSpline.is_local());
    }

    fn ascending_knots() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        proptest::collection::vec((0.01f64..2.0, 0.5f64..1.0), 2..12).prop_map(|steps| {
            let mut x = 0.0;
            steps
                .into_iter()
                .map(|(dx, y)| {
                    x += dx;
                    (x, y)
                })
                .unzip()
        })
    }

    proptest! {
        #[test]
        fn prop_knots_reproduced_exactly((xs, ys) in ascending_knots()) {
            for method in METHODS {
                let interp = method.build(xs.clone(), ys.clone(), Extrapolation::None).unwrap();
                for (x, y) in xs.iter().zip(&ys) {
                    prop_assert_eq!(interp.interpolate(*x).unwrap(), *y);
                }
            }
        }

        #[test]
        fn prop_linear_stays_within_neighbours((xs, ys) in ascending_knots(), frac in 0.0f64..1.0) {
            let interp = LinearInterpolator::new(xs.clone(), ys.clone()).unwrap();
            for i in 0..xs.len() - 1 {
                let x = xs[i] + frac * (xs[i + 1] - xs[i]);
                let y = interp.value_at(x, Extrapolation::Flat).unwrap();
                let (lo, hi) = if ys[i] < ys[i + 1] { (ys[i], ys[i + 1]) } else { (ys[i + 1], ys[i]) };
                prop_assert!(y >= lo - 1e-12 && y <= hi + 1e-12);
            }
        }
    }
}
