//! Levenberg-Marquardt least-squares optimiser.

use nalgebra::{DMatrix, DVector};

use super::{
    initial_objective, sum_of_squares, LeastSquaresSolver, OptimizationResult, ParameterBounds,
    Residuals,
};
use crate::budget::SolveBudget;
use crate::error::MathResult;
use crate::linear_algebra::{normal_equations, solve_linear_system};

/// Levenberg-Marquardt: Gauss-Newton steps damped by `λ·diag(JᵀJ)`.
///
/// The Jacobian is estimated by forward differences. Each iteration solves
///
/// ```text
/// (JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr
/// ```
///
/// and projects `x + δ` onto the bounds. An improving step is accepted and
/// `λ` shrinks; otherwise `λ` grows and the step is retried from the same
/// point.
///
/// Convergence: the objective falls below `tolerance`, the proposed step is
/// smaller than `tolerance` relative to `x` (after projection), or the
/// relative reduction of the objective is below `tolerance`. A damping above
/// `max_lambda` means no descent direction was found and is reported as not
/// converged.
#[derive(Debug, Clone, Copy)]
pub struct LevenbergMarquardt {
    /// Initial damping.
    pub initial_lambda: f64,
    /// Factor applied to the damping on rejection (divided on acceptance).
    pub lambda_factor: f64,
    /// Lower limit for the damping.
    pub min_lambda: f64,
    /// Damping above which the search is considered stalled.
    pub max_lambda: f64,
    /// Relative step for the finite-difference Jacobian.
    pub jacobian_step: f64,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            jacobian_step: 1e-7,
        }
    }
}

impl LevenbergMarquardt {
    /// Sets the initial damping.
    #[must_use]
    pub fn with_initial_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }

    /// Sets the finite-difference step.
    #[must_use]
    pub fn with_jacobian_step(mut self, step: f64) -> Self {
        self.jacobian_step = step;
        self
    }

    /// Forward-difference Jacobian, stepping backwards at an upper bound.
    fn jacobian(
        &self,
        residuals: &Residuals<'_>,
        x: &[f64],
        r: &[f64],
        bounds: &ParameterBounds,
    ) -> DMatrix<f64> {
        let m = r.len();
        let n = x.len();
        let mut jacobian = DMatrix::zeros(m, n);

        for j in 0..n {
            let mut h = self.jacobian_step * x[j].abs().max(1.0);
            if x[j] + h > bounds.upper()[j] {
                h = -h;
            }
            let mut bumped = x.to_vec();
            bumped[j] += h;
            let r_bumped = residuals(&bumped);

            for i in 0..m.min(r_bumped.len()) {
                let d = (r_bumped[i] - r[i]) / h;
                jacobian[(i, j)] = if d.is_finite() { d } else { 0.0 };
            }
        }

        jacobian
    }
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn minimize(
        &self,
        residuals: &Residuals<'_>,
        initial: &[f64],
        bounds: &ParameterBounds,
        budget: &SolveBudget,
    ) -> MathResult<OptimizationResult> {
        bounds.check_dimension(initial)?;
        let clock = budget.start();
        let tol = budget.tolerance;

        let mut x = initial.to_vec();
        bounds.project(&mut x);
        let (mut r, mut cost) = initial_objective(residuals, &x)?;
        let n = x.len();
        let mut lambda = self.initial_lambda;
        let mut normal: Option<(DMatrix<f64>, DVector<f64>)> = None;

        let done = |x: Vec<f64>, cost: f64, iterations: u32, converged: bool| OptimizationResult {
            parameters: x,
            objective_value: cost,
            iterations,
            converged,
        };

        for iteration in 0..budget.max_iterations {
            clock.check(iteration)?;

            if cost <= tol {
                return Ok(done(x, cost, iteration, true));
            }

            let (jtj, jtr) = match normal.take() {
                Some(system) => system,
                None => {
                    let jacobian = self.jacobian(residuals, &x, &r, bounds);
                    normal_equations(&jacobian, &DVector::from_column_slice(&r))
                }
            };

            if jtr.amax() == 0.0 {
                return Ok(done(x, cost, iteration, true));
            }

            let mut damped = jtj.clone();
            for i in 0..n {
                damped[(i, i)] += lambda * jtj[(i, i)].max(1e-12);
            }

            let scale: f64 = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            let candidate = solve_linear_system(&damped, &(-&jtr)).ok().map(|delta| {
                let mut candidate: Vec<f64> = x.iter().zip(delta.iter()).map(|(v, d)| v + d).collect();
                bounds.project(&mut candidate);
                let step = x
                    .iter()
                    .zip(&candidate)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt();
                (candidate, step)
            });

            let Some((candidate, step)) = candidate else {
                normal = Some((jtj, jtr));
                lambda *= self.lambda_factor;
                continue;
            };

            // Projection cancelled the whole step: stationary on the boundary
            if step <= tol * (scale + tol) {
                return Ok(done(x, cost, iteration + 1, true));
            }

            let r_candidate = residuals(&candidate);
            let candidate_cost = if r_candidate.len() == r.len() {
                sum_of_squares(&r_candidate)
            } else {
                None
            };

            match candidate_cost {
                Some(candidate_cost) if candidate_cost < cost => {
                    let reduction = (cost - candidate_cost) / cost;

                    x = candidate;
                    r = r_candidate;
                    cost = candidate_cost;
                    lambda = (lambda / self.lambda_factor).max(self.min_lambda);

                    if cost <= tol || reduction <= tol {
                        return Ok(done(x, cost, iteration + 1, true));
                    }
                }
                _ => {
                    normal = Some((jtj, jtr));
                    lambda *= self.lambda_factor;
                    if lambda > self.max_lambda {
                        return Ok(done(x, cost, iteration + 1, false));
                    }
                }
            }
        }

        Ok(done(x, cost, budget.max_iterations, false))
    }

    fn name(&self) -> &'static str {
        "Levenberg-Marquardt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::CancellationToken;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_rosenbrock() {
        let residuals = |p: &[f64]| vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]];
        let result = LevenbergMarquardt::default()
            .minimize(
                &residuals,
                &[-1.2, 1.0],
                &ParameterBounds::unbounded(2),
                &SolveBudget::new(1e-20, 200),
            )
            .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_respects_bounds() {
        // Unconstrained minimum at x = -1, box starts at 0
        let residuals = |p: &[f64]| vec![p[0] + 1.0];
        let bounds = ParameterBounds::new(vec![0.0], vec![5.0]).unwrap();
        let result = LevenbergMarquardt::default()
            .minimize(&residuals, &[3.0], &bounds, &SolveBudget::default())
            .unwrap();

        assert!(bounds.contains(&result.parameters));
        assert_relative_eq!(result.parameters[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overdetermined_linear_fit() {
        // Zero rates 2%, 2.5%, 3%, 3.5% at 1..4y: intercept 1.5%, slope 0.5%
        let samples = [(1.0, 0.02), (2.0, 0.025), (3.0, 0.03), (4.0, 0.035)];
        let residuals = |p: &[f64]| samples.iter().map(|(t, z)| p[0] + p[1] * t - z).collect();
        let result = LevenbergMarquardt::default()
            .minimize(
                &residuals,
                &[0.0, 0.0],
                &ParameterBounds::unbounded(2),
                &SolveBudget::new(1e-24, 100),
            )
            .unwrap();

        assert_relative_eq!(result.parameters[0], 0.015, epsilon = 1e-9);
        assert_relative_eq!(result.parameters[1], 0.005, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_start_rejected() {
        let residuals = |p: &[f64]| vec![p[0].ln()];
        let result = LevenbergMarquardt::default().minimize(
            &residuals,
            &[-1.0],
            &ParameterBounds::unbounded(1),
            &SolveBudget::default(),
        );
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let residuals = |p: &[f64]| vec![p[0] - 1.0];
        let result = LevenbergMarquardt::default().minimize(
            &residuals,
            &[0.0],
            &ParameterBounds::unbounded(1),
            &SolveBudget::default().with_cancellation(token),
        );
        assert_eq!(result.unwrap_err(), MathError::Cancelled { iterations: 0 });
    }
}
