//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values. On discount factors this keeps every
//! interpolated value positive and makes the instantaneous forward rate
//! piecewise constant between knots.

use super::knots::Knots;
use super::{resolve, Extrapolation, Interpolator, Resolved, Side};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between data points.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// Extrapolation continues the boundary segment linearly in `ln(y)`.
///
/// # Example
///
/// ```rust
/// use curvekit_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.94 && df < 0.97);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    knots: Knots,
    log_ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Same as [`super::LinearInterpolator::new`], plus `InvalidInput` if any
    /// y value is non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let knots = Knots::new(xs, ys, 2)?;

        let mut log_ys = Vec::with_capacity(knots.len());
        for (i, &y) in knots.ys().iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "y[{i}] = {y} is not positive; log-linear requires positive values"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self {
            knots,
            log_ys,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the default extrapolation policy used by [`Interpolator::interpolate`].
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: impl Into<Extrapolation>) -> Self {
        self.extrapolation = extrapolation.into();
        self
    }

    fn log_slope(&self, i: usize) -> f64 {
        let xs = self.knots.xs();
        (self.log_ys[i + 1] - self.log_ys[i]) / (xs[i + 1] - xs[i])
    }

    fn on_segment(&self, i: usize, x: f64) -> f64 {
        let xs = self.knots.xs();
        (self.log_ys[i] + self.log_slope(i) * (x - xs[i])).exp()
    }
}

impl Interpolator for LogLinearInterpolator {
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
        let last = self.knots.last_segment();
        let segment = match resolve(&self.knots, x, extrapolation)? {
            Resolved::Flat(_) => return Ok(0.0),
            Resolved::Knot(i) => i.min(last),
            Resolved::Segment(i) => i,
            Resolved::Continue(Side::Below) => 0,
            Resolved::Continue(Side::Above) => last,
        };
        // d/dx exp(l(x)) = exp(l(x)) * l'(x)
        Ok(self.on_segment(segment, x) * self.log_slope(segment))
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometric_midpoint() {
        let interp = LogLinearInterpolator::new(vec![0.0, 2.0], vec![1.0, 0.81]).unwrap();
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_forward_rate() {
        let rate = 0.05_f64;
        let interp =
            LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, (-rate).exp()]).unwrap();
        for x in [0.1, 0.4, 0.9] {
            let df = interp.interpolate(x).unwrap();
            assert_relative_eq!(-interp.derivative(x).unwrap() / df, rate, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrapolates_in_log_space() {
        let interp = LogLinearInterpolator::new(vec![1.0, 2.0], vec![0.95, 0.9025]).unwrap();
        // Constant ratio 0.95 per unit, continued beyond the last knot
        assert_relative_eq!(
            interp.value_at(3.0, Extrapolation::Linear).unwrap(),
            0.857375,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            interp.value_at(0.0, Extrapolation::Linear).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![-1.0, 1.0]).is_err());
    }

    #[test]
    fn test_knot_values_exact() {
        let ys = vec![1.0, 0.973_214_5, 0.941_003_1];
        let interp = LogLinearInterpolator::new(vec![0.0, 1.0, 2.0], ys.clone()).unwrap();
        for (x, y) in [0.0, 1.0, 2.0].iter().zip(&ys) {
            assert_eq!(interp.interpolate(*x).unwrap(), *y);
        }
    }
}
