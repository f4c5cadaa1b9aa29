//! Natural cubic spline interpolation.

use super::knots::Knots;
use super::{resolve, Extrapolation, Interpolator, Resolved, Side};
use crate::error::MathResult;

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second derivatives;
/// the second derivative is zero at both ends. With only two knots the spline
/// reduces to a straight line.
///
/// The spline is not local: moving one knot changes every segment. Curve
/// bootstrappers using it must iterate until the knots settle.
///
/// Extrapolation continues along the tangent at the boundary knot.
///
/// # Example
///
/// ```rust
/// use curvekit_math::interpolation::{CubicSpline, Interpolator};
///
/// let spline = CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap();
/// assert_eq!(spline.interpolate(2.0).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Knots,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    extrapolation: Extrapolation,
}

impl CubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, mismatched lengths,
    /// duplicate or descending abscissas.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let knots = Knots::new(xs, ys, 2)?;
        let y2s = second_derivatives(knots.xs(), knots.ys());
        Ok(Self {
            knots,
            y2s,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the default extrapolation policy used by [`Interpolator::interpolate`].
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: impl Into<Extrapolation>) -> Self {
        self.extrapolation = extrapolation.into();
        self
    }

    fn segment_terms(&self, i: usize, x: f64) -> (f64, f64, f64) {
        let xs = self.knots.xs();
        let h = xs[i + 1] - xs[i];
        let a = (xs[i + 1] - x) / h;
        let b = (x - xs[i]) / h;
        (h, a, b)
    }

    fn on_segment(&self, i: usize, x: f64) -> f64 {
        let ys = self.knots.ys();
        let (h, a, b) = self.segment_terms(i, x);
        a * ys[i]
            + b * ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h) / 6.0
    }

    fn slope_on_segment(&self, i: usize, x: f64) -> f64 {
        let ys = self.knots.ys();
        let (h, a, b) = self.segment_terms(i, x);
        (ys[i + 1] - ys[i]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[i + 1]
    }

    fn tangent(&self, side: Side) -> (f64, f64, f64) {
        let (xs, ys) = (self.knots.xs(), self.knots.ys());
        match side {
            Side::Below => (xs[0], ys[0], self.slope_on_segment(0, xs[0])),
            Side::Above => {
                let last = self.knots.last_segment();
                let n = xs.len() - 1;
                (xs[n], ys[n], self.slope_on_segment(last, xs[n]))
            }
        }
    }
}

impl Interpolator for CubicSpline {
    fn value_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64> {
        Ok(match resolve(&self.knots, x, extrapolation)? {
            Resolved::Knot(i) => self.knots.ys()[i],
            Resolved::Flat(y) => y,
            Resolved::Segment(i) => self.on_segment(i, x),
            Resolved::Continue(side) => {
                let (x0, y0, slope) = self.tangent(side);
                y0 + slope * (x - x0)
            }
        })
    }

    fn derivative_at(&self, x: f64, extrapolation: Extrapolation) -> MathResult<f64> {
        Ok(match resolve(&self.knots, x, extrapolation)? {
            Resolved::Flat(_) => 0.0,
            Resolved::Knot(i) => self.slope_on_segment(i.min(self.knots.last_segment()), x),
            Resolved::Segment(i) => self.slope_on_segment(i, x),
            Resolved::Continue(side) => self.tangent(side).2,
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

/// Second derivatives at the knots of a natural spline (tridiagonal sweep).
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let d = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * d / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    y2s[n - 1] = 0.0;
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
