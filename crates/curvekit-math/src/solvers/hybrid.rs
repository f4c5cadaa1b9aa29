//! Hybrid root-finding: Newton-Raphson with a Brent fallback.

use crate::budget::BudgetClock;
use crate::error::{MathError, MathResult};
use crate::solvers::{brent, SolveBudget, SolverResult, NUMERICAL_DERIVATIVE_STEP};

/// Newton iterations tried before falling back to Brent.
const NEWTON_ITERATIONS: u32 = 20;

/// Consecutive residual blow-ups tolerated before Newton is abandoned.
const MAX_DIVERGENCE: u32 = 3;

/// Hybrid root-finding algorithm.
///
/// Runs a short, monitored Newton-Raphson iteration. If Newton diverges, hits
/// a flat derivative or does not converge, Brent's method takes over on
/// `bounds`, or on a bracket searched outward from `initial_guess` when no
/// bounds are given.
///
/// Budget exhaustion and cancellation are returned immediately and never
/// trigger the fallback.
///
/// # Example
///
/// ```rust
/// use curvekit_math::solvers::{hybrid, SolveBudget};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolveBudget::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    budget: &SolveBudget,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let clock = budget.start();
    match monitored_newton(&f, &df, initial_guess, budget, &clock) {
        Ok(result) => Ok(result),
        Err(err @ (MathError::Cancelled { .. } | MathError::BudgetExhausted { .. })) => Err(err),
        Err(newton_err) => {
            let (a, b) = match bounds {
                Some(bracket) => bracket,
                None => find_bracket(&f, initial_guess).ok_or_else(|| {
                    MathError::invalid_input(format!(
                        "Newton-Raphson failed ({newton_err}) and no bracketing interval was found"
                    ))
                })?,
            };
            brent(&f, a, b, budget)
        }
    }
}

/// Hybrid solver with a central-difference derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    budget: &SolveBudget,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let h = NUMERICAL_DERIVATIVE_STEP;
    let df = |x: f64| (f(x + h) - f(x - h)) / (2.0 * h);

    hybrid(&f, df, initial_guess, bounds, budget)
}

fn monitored_newton<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    budget: &SolveBudget,
    clock: &BudgetClock<'_>,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;
    let max_iterations = budget.max_iterations.min(NEWTON_ITERATIONS);

    for iteration in 0..max_iterations {
        clock.check(iteration)?;
        let fx = f(x);
        let residual = fx.abs();

        if residual < budget.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::convergence_failed(iteration, residual));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if dfx.abs() < 1e-15 || !dfx.is_finite() {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        if step.abs() > 1e10 {
            return Err(MathError::convergence_failed(iteration, residual));
        }

        x -= step;
        if !x.is_finite() {
            return Err(MathError::convergence_failed(iteration, residual));
        }

        if step.abs() < budget.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(max_iterations, f(x).abs()))
}

/// Expands outward from `initial_guess` until the sign of `f` changes.
fn find_bracket<F>(f: &F, initial_guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let (mut left, mut right) = if initial_guess.abs() < 1e-10 {
        (-1.0, 1.0)
    } else {
        (initial_guess, initial_guess)
    };
    let mut delta = 0.1;
    let f_init = f(initial_guess);

    while delta <= 1e6 {
        left -= delta;
        right += delta;

        let f_left = f(left);
        let f_right = f(right);

        if f_left * f_init < 0.0 {
            return Some((left, initial_guess));
        }
        if f_right * f_init < 0.0 {
            return Some((initial_guess, right));
        }
        if f_left * f_right < 0.0 {
            return Some((left, right));
        }

        delta *= 2.0;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::CancellationToken;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolveBudget::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_fallback_to_brent() {
        // Flat derivative at the initial guess forces the fallback
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |_: f64| 0.0;

        let result = hybrid(f, df, 0.0, Some((1.0, 3.0)), &SolveBudget::default()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
    }

    #[test]
    fn test_auto_bracket_finding() {
        let f = |x: f64| x * x - 2.0;
        let df = |_: f64| 0.0;

        let result = hybrid(f, df, 1.5, None, &SolveBudget::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_no_root_anywhere() {
        let f = |x: f64| x * x + 1.0;

        let result = hybrid_numerical(f, 0.5, None, &SolveBudget::default());

        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_cancellation_skips_fallback() {
        let token = CancellationToken::new();
        token.cancel();
        let budget = SolveBudget::default().with_cancellation(token);
        let f = |x: f64| x * x - 2.0;

        let result = hybrid_numerical(f, 1.5, Some((1.0, 2.0)), &budget);

        assert!(matches!(result, Err(MathError::Cancelled { .. })));
    }

    #[test]
    fn test_par_swap_like_calculation() {
        // Flat continuous rate at which a 5y annual 5% coupon stream prices at 95
        let price = |r: f64| {
            let coupons: f64 = (1..=5).map(|t| 5.0 * (-r * f64::from(t)).exp()).sum();
            coupons + 100.0 * (-r * 5.0).exp() - 95.0
        };

        let result = hybrid_numerical(price, 0.05, Some((0.0, 0.2)), &SolveBudget::default())
            .unwrap();

        assert!(price(result.root).abs() < 1e-9);
        assert!(result.root > 0.05_f64.ln_1p());
    }
}
