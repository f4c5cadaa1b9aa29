//! Linear interpolation.

use super::knots::Knots;
use super::{resolve, Extrapolation, Interpolator, Resolved, Side};
use crate::error::MathResult;

/// Linear interpolation between data points.
///
/// Extrapolation continues the boundary segment's straight line.
///
/// # Example
///
/// ```rust
/// use curvekit_math::interpolation::{Extrapolation, Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.05, 0.075]).unwrap();
/// assert!((interp.value_at(1.5, Extrapolation::None).unwrap() - 0.0625).abs() < 1e-12);
/// assert!((interp.value_at(2.5, Extrapolation::Linear).unwrap() - 0.0875).abs() < 1e-12);
/// assert!((interp.value_at(3.0, Extrapolation::Linear).unwrap() - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    knots: Knots,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, mismatched lengths,
    /// duplicate or descending abscissas.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            knots: Knots::new(xs, ys, 2)?,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the default extrapolation policy used by [`Interpolator::interpolate`].
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: impl Into<Extrapolation>) -> Self {
        self.extrapolation = extrapolation.into();
        self
    }

    fn slope(&self, i: usize) -> f64 {
        let (xs, ys) = (self.knots.xs(), self.knots.ys());
        (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
    }

    fn on_segment(&self, i: usize, x: f64) -> f64 {
        let (xs, ys) = (self.knots.xs(), self.knots.ys());
        ys[i] + self.slope(i) * (x - xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn value_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64> {
        Ok(match resolve(&self.knots, x, extrapolation)? {
            Resolved::Knot(i) => self.knots.ys()[i],
            Resolved::Flat(y) => y,
            Resolved::Segment(i) => self.on_segment(i, x),
            Resolved::Continue(Side::Below) => self.on_segment(0, x),
            Resolved::Continue(Side::Above) => self.on_segment(self.knots.last_segment(), x),
        })
    }

    fn derivative_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64> {
        Ok(match resolve(&self.knots, x, extrapolation)? {
            Resolved::Flat(_) => 0.0,
            Resolved::Knot(i) => self.slope(i.min(self.knots.last_segment())),
            Resolved::Segment(i) => self.slope(i),
            Resolved::Continue(Side::Below) => self.slope(0),
            Resolved::Continue(Side::Above) => self.slope(self.knots.last_segment()),
        })
    }

    fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    fn knots(&self) -> &Knots {
        &self.knots
    }

    fn box_clone(&self) -> Box<dyn Interpolator> {
        Box::new(self.clone())
    }
}
