//! Newton-Raphson root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolveBudget, SolverResult, NUMERICAL_DERIVATIVE_STEP};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`, converging
/// quadratically near the root.
///
/// # Errors
///
/// `DivisionByZero` on a vanishing derivative, `ConvergenceFailed` when the
/// iteration cap is hit, `BudgetExhausted` / `Cancelled` from the budget.
///
/// # Example
///
/// ```rust
/// use curvekit_math::solvers::{newton_raphson, SolveBudget};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolveBudget::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    budget: &SolveBudget,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let clock = budget.start();
    let mut x = initial_guess;

    for iteration in 0..budget.max_iterations {
        clock.check(iteration)?;
        let fx = f(x);

        if fx.abs() < budget.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if dfx.abs() < 1e-15 || !dfx.is_finite() {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if !x.is_finite() {
            return Err(MathError::convergence_failed(iteration + 1, f64::INFINITY));
        }

        if step.abs() < budget.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(
        budget.max_iterations,
        f(x).abs(),
    ))
}

/// Newton-Raphson with a central-difference derivative.
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    budget: &SolveBudget,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let h = NUMERICAL_DERIVATIVE_STEP;
    let df = |x: f64| (f(x + h) - f(x - h)) / (2.0 * h);

    newton_raphson(&f, df, initial_guess, budget)
}
