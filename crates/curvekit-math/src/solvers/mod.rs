//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: quadratic convergence when a derivative is available
//! - [`brent`]: bracketing method, guaranteed to converge on a valid bracket
//! - [`hybrid`]: Newton-Raphson with Brent fallback
//!
//! All solvers take a [`SolveBudget`] and check its time limit and
//! cancellation token once per iteration.
//!
//! # Example
//!
//! ```rust
//! use curvekit_math::solvers::{hybrid_numerical, SolveBudget};
//!
//! // Continuously compounded rate that discounts 1.0 to 0.95 over two years
//! let f = |r: f64| (-r * 2.0).exp() - 0.95;
//!
//! let result = hybrid_numerical(f, 0.01, Some((0.0, 0.2)), &SolveBudget::default()).unwrap();
//! assert!((result.root - 0.025_646_647).abs() < 1e-8);
//! ```

mod brent;
mod hybrid;
mod newton;

pub use brent::brent;
pub use hybrid::{hybrid, hybrid_numerical};
pub use newton::{newton_raphson, newton_raphson_numerical};

pub use crate::budget::{SolveBudget, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MathResult;

/// Step used for central-difference derivatives.
pub(crate) const NUMERICAL_DERIVATIVE_STEP: f64 = 1e-8;

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

/// Trait for root-finding solvers with optional derivative.
///
/// # Example
///
/// ```rust
/// use curvekit_math::solvers::{NewtonSolver, SolveBudget, Solver};
///
/// let solver = NewtonSolver;
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = solver.solve(f, Some(df), 1.5, None, &SolveBudget::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub trait Solver: Send + Sync {
    /// Solves for a root of `f`.
    ///
    /// # Arguments
    ///
    /// * `f` - The function for which to find a root
    /// * `derivative` - Optional derivative function (used if available)
    /// * `initial_guess` - Starting point for the search
    /// * `bounds` - Optional bracketing interval (a, b)
    /// * `budget` - Tolerance and limits
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        budget: &SolveBudget,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl Solver for NewtonSolver {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        _bounds: Option<(f64, f64)>,
        budget: &SolveBudget,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match derivative {
            Some(df) => newton_raphson(f, df, initial_guess, budget),
            None => newton_raphson_numerical(f, initial_guess, budget),
        }
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Brent's method solver.
///
/// Without bounds it brackets `initial_guess ± 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrentSolver;

impl Solver for BrentSolver {
    fn solve<F, D>(
        &self,
        f: F,
        _derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        budget: &SolveBudget,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        let (a, b) = bounds.unwrap_or((initial_guess - 1.0, initial_guess + 1.0));
        brent(f, a, b, budget)
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

/// Hybrid solver (Newton + Brent fallback).
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridSolver;

impl Solver for HybridSolver {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        budget: &SolveBudget,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match derivative {
            Some(df) => hybrid(f, df, initial_guess, bounds, budget),
            None => hybrid_numerical(f, initial_guess, bounds, budget),
        }
    }

    fn name(&self) -> &'static str {
        "Hybrid (Newton + Brent)"
    }
}

/// Root finder selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RootSolverKind {
    /// [`NewtonSolver`]
    Newton,
    /// [`BrentSolver`]
    Brent,
    /// [`HybridSolver`]
    #[default]
    Hybrid,
}

impl Solver for RootSolverKind {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        budget: &SolveBudget,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match self {
            RootSolverKind::Newton => {
                NewtonSolver.solve(f, derivative, initial_guess, bounds, budget)
            }
            RootSolverKind::Brent => BrentSolver.solve(f, derivative, initial_guess, bounds, budget),
            RootSolverKind::Hybrid => {
                HybridSolver.solve(f, derivative, initial_guess, bounds, budget)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RootSolverKind::Newton => NewtonSolver.name(),
            RootSolverKind::Brent => BrentSolver.name(),
            RootSolverKind::Hybrid => HybridSolver.name(),
        }
    }
}

impl fmt::Display for RootSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
