//! Nonlinear least-squares optimisers.
//!
//! Calibration problems are phrased as a residual function `r(x) -> Vec<f64>`
//! whose sum of squares is minimised subject to box [`ParameterBounds`].
//! Implementations sit behind [`LeastSquaresSolver`] so callers can swap a
//! Jacobian-based method for a derivative-free one:
//!
//! - [`LevenbergMarquardt`]: damped Gauss-Newton with a numerical Jacobian
//! - [`NelderMead`]: simplex search, no derivatives
//!
//! Both take a [`SolveBudget`]: `tolerance` applies to the objective and to
//! the step size, `max_iterations` caps the outer loop, and the time budget
//! and cancellation token are checked once per iteration.

mod levenberg_marquardt;
mod nelder_mead;

pub use levenberg_marquardt::LevenbergMarquardt;
pub use nelder_mead::NelderMead;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::budget::SolveBudget;
use crate::error::{MathError, MathResult};

/// Residual function of a least-squares problem.
pub type Residuals<'a> = dyn Fn(&[f64]) -> Vec<f64> + 'a;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value (sum of squared residuals).
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// Lower and upper limits per parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl ParameterBounds {
    /// Creates bounds from per-parameter limits.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the lengths differ, a limit is NaN or a lower limit
    /// exceeds its upper limit.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> MathResult<Self> {
        if lower.len() != upper.len() {
            return Err(MathError::invalid_input(format!(
                "{} lower bounds but {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        for (i, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(MathError::invalid_input(format!(
                    "bounds for parameter {i} are invalid: [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// No limits on `n` parameters.
    #[must_use]
    pub fn unbounded(n: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns true if no parameters are bounded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower limits.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper limits.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Clamps `x` into the box in place.
    pub fn project(&self, x: &mut [f64]) {
        for ((v, lo), hi) in x.iter_mut().zip(&self.lower).zip(&self.upper) {
            *v = v.clamp(*lo, *hi);
        }
    }

    /// Returns true if every coordinate of `x` lies inside the box.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.iter()
            .zip(&self.lower)
            .zip(&self.upper)
            .all(|((v, lo), hi)| v >= lo && v <= hi)
    }

    pub(crate) fn check_dimension(&self, initial: &[f64]) -> MathResult<()> {
        if initial.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if initial.len() != self.len() {
            return Err(MathError::invalid_input(format!(
                "{} initial parameters but {} bounds",
                initial.len(),
                self.len()
            )));
        }
        Ok(())
    }
}

/// A nonlinear least-squares minimiser.
pub trait LeastSquaresSolver: Send + Sync + fmt::Debug {
    /// Minimises `Σ r_i(x)²` starting from `initial`, keeping `x` inside
    /// `bounds`.
    ///
    /// Hitting the iteration cap is not an error: the best point found is
    /// returned with `converged == false`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on dimension mismatches or non-finite residuals at the
    /// starting point, `BudgetExhausted` / `Cancelled` from the budget.
    fn minimize(
        &self,
        residuals: &Residuals<'_>,
        initial: &[f64],
        bounds: &ParameterBounds,
        budget: &SolveBudget,
    ) -> MathResult<OptimizationResult>;

    /// Returns the name of the optimiser.
    fn name(&self) -> &'static str;
}

/// Optimiser selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OptimizerKind {
    /// [`LevenbergMarquardt`] with default settings.
    #[default]
    LevenbergMarquardt,
    /// [`NelderMead`] with default settings.
    NelderMead,
}

impl OptimizerKind {
    /// Builds the optimiser.
    #[must_use]
    pub fn solver(&self) -> Box<dyn LeastSquaresSolver> {
        match self {
            OptimizerKind::LevenbergMarquardt => Box::new(LevenbergMarquardt::default()),
            OptimizerKind::NelderMead => Box::new(NelderMead::default()),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::LevenbergMarquardt => write!(f, "LevenbergMarquardt"),
            OptimizerKind::NelderMead => write!(f, "NelderMead"),
        }
    }
}

/// Sum of squares, or `None` if any residual is not finite.
pub(crate) fn sum_of_squares(residuals: &[f64]) -> Option<f64> {
    residuals
        .iter()
        .try_fold(0.0, |acc, r| r.is_finite().then(|| acc + r * r))
}

/// Evaluates the objective at the starting point, rejecting bad residuals.
pub(crate) fn initial_objective(residuals: &Residuals<'_>, x: &[f64]) -> MathResult<(Vec<f64>, f64)> {
    let r = residuals(x);
    if r.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    match sum_of_squares(&r) {
        Some(cost) => Ok((r, cost)),
        None => Err(MathError::invalid_input(format!(
            "residuals are not finite at the starting point {x:?}"
        ))),
    }
}
