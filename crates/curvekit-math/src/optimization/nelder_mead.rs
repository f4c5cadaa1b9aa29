//! Nelder-Mead simplex optimiser.

use super::{
    initial_objective, sum_of_squares, LeastSquaresSolver, OptimizationResult, ParameterBounds,
    Residuals,
};
use crate::budget::SolveBudget;
use crate::error::MathResult;

/// Derivative-free simplex search on the sum of squared residuals.
///
/// Standard reflection (1), expansion (2), contraction (½) and shrink (½)
/// coefficients. Trial points are projected onto the bounds before they are
/// evaluated; a trial with non-finite residuals counts as `+∞`.
///
/// Converged when the best objective falls below `tolerance`, or when the
/// objective spread across the simplex or the simplex diameter falls below
/// `tolerance` (relative).
#[derive(Debug, Clone, Copy)]
pub struct NelderMead {
    /// Initial vertex offset, relative to each non-zero starting parameter.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self { initial_step: 0.1 }
    }
}

impl NelderMead {
    /// Sets the initial vertex offset.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    fn initial_simplex(&self, x0: &[f64], bounds: &ParameterBounds) -> Vec<Vec<f64>> {
        let mut vertices = Vec::with_capacity(x0.len() + 1);
        vertices.push(x0.to_vec());
        for i in 0..x0.len() {
            let offset = if x0[i].abs() > 1e-8 {
                self.initial_step * x0[i].abs()
            } else {
                self.initial_step
            };
            let mut v = x0.to_vec();
            v[i] += offset;
            if v[i] > bounds.upper()[i] {
                v[i] = x0[i] - offset;
            }
            bounds.project(&mut v);
            vertices.push(v);
        }
        vertices
    }
}

fn combine(a: &[f64], wa: f64, b: &[f64], wb: f64, bounds: &ParameterBounds) -> Vec<f64> {
    let mut point: Vec<f64> = a.iter().zip(b).map(|(x, y)| wa * x + wb * y).collect();
    bounds.project(&mut point);
    point
}

fn finish(
    vertices: &[Vec<f64>],
    values: &[f64],
    best: usize,
    iterations: u32,
    converged: bool,
) -> OptimizationResult {
    OptimizationResult {
        parameters: vertices[best].clone(),
        objective_value: values[best],
        iterations,
        converged,
    }
}

fn diameter(vertices: &[Vec<f64>], best: usize) -> f64 {
    vertices
        .iter()
        .map(|v| {
            v.iter()
                .zip(&vertices[best])
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        })
        .fold(0.0, f64::max)
}

impl LeastSquaresSolver for NelderMead {
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

        let mut x0 = initial.to_vec();
        bounds.project(&mut x0);
        initial_objective(residuals, &x0)?;

        let cost = |x: &[f64]| sum_of_squares(&residuals(x)).unwrap_or(f64::INFINITY);
        let n = x0.len();
        let mut vertices = self.initial_simplex(&x0, bounds);
        let mut values: Vec<f64> = vertices.iter().map(|v| cost(v)).collect();

        for iteration in 0..budget.max_iterations {
            clock.check(iteration)?;

            let (mut ilo, mut ihi) = (0usize, 0usize);
            for i in 1..=n {
                if values[i] < values[ilo] {
                    ilo = i;
                }
                if values[i] > values[ihi] {
                    ihi = i;
                }
            }
            let mut inhi = ilo;
            for i in 0..=n {
                if i != ihi && values[i] > values[inhi] {
                    inhi = i;
                }
            }

            let spread = values[ihi] - values[ilo];
            let size = vertices[ilo].iter().fold(1.0, |m: f64, v| m.max(v.abs()));
            if values[ilo] <= tol
                || spread <= tol * (values[ihi].abs() + values[ilo].abs()) + f64::MIN_POSITIVE
                || diameter(&vertices, ilo) <= tol * size
            {
                return Ok(finish(&vertices, &values, ilo, iteration, true));
            }

            let mut centroid = vec![0.0; n];
            for (i, v) in vertices.iter().enumerate() {
                if i != ihi {
                    for (c, x) in centroid.iter_mut().zip(v) {
                        *c += x / n as f64;
                    }
                }
            }

            let reflected = combine(&centroid, 2.0, &vertices[ihi], -1.0, bounds);
            let fr = cost(&reflected);

            if fr < values[ilo] {
                let expanded = combine(&centroid, -1.0, &reflected, 2.0, bounds);
                let fe = cost(&expanded);
                if fe < fr {
                    vertices[ihi] = expanded;
                    values[ihi] = fe;
                } else {
                    vertices[ihi] = reflected;
                    values[ihi] = fr;
                }
            } else if fr < values[inhi] {
                vertices[ihi] = reflected;
                values[ihi] = fr;
            } else {
                let contracted = if fr < values[ihi] {
                    combine(&centroid, 0.5, &reflected, 0.5, bounds)
                } else {
                    combine(&centroid, 0.5, &vertices[ihi], 0.5, bounds)
                };
                let fc = cost(&contracted);
                if fc < values[ihi].min(fr) {
                    vertices[ihi] = contracted;
                    values[ihi] = fc;
                } else {
                    let best = vertices[ilo].clone();
                    for i in 0..=n {
                        if i != ilo {
                            vertices[i] = combine(&best, 0.5, &vertices[i], 0.5, bounds);
                            values[i] = cost(&vertices[i]);
                        }
                    }
                }
            }
        }

        let best = (0..=n)
            .min_by(|&a, &b| values[a].total_cmp(&values[b]))
            .unwrap_or(0);
        Ok(finish(&vertices, &values, best, budget.max_iterations, false))
    }

    fn name(&self) -> &'static str {
        "Nelder-Mead"
    }
}
