//! Root-finding and optimisation settings shared by curve and surface builds.

use std::time::Duration;

use curvekit_math::solvers::{RootSolverKind, SolveBudget};
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Tightest tolerance accepted from configuration.
const MIN_TOLERANCE: f64 = 1e-20;

/// Loosest tolerance accepted from configuration.
const MAX_TOLERANCE: f64 = 1e-4;

/// Iteration cap accepted from configuration.
const MAX_ITERATIONS: u32 = 10_000;

/// Tolerance, iteration cap and optional wall-clock limit for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Root finder used for iterative knots.
    pub root_solver: RootSolverKind,
    /// Convergence tolerance.
    pub tolerance: f64,
    /// Maximum iterations.
    pub max_iterations: u32,
    /// Wall-clock limit per solve in milliseconds.
    pub time_budget_ms: Option<u64>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            root_solver: RootSolverKind::Hybrid,
            tolerance: 1e-12,
            max_iterations: 100,
            time_budget_ms: None,
        }
    }
}

impl SolverSettings {
    /// Creates settings with the given tolerance and iteration cap.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the wall-clock limit.
    #[must_use]
    pub fn with_time_budget_ms(mut self, millis: u64) -> Self {
        self.time_budget_ms = Some(millis);
        self
    }

    /// The typed budget handed to solvers.
    #[must_use]
    pub fn to_budget(&self) -> SolveBudget {
        let budget = SolveBudget::new(self.tolerance, self.max_iterations);
        match self.time_budget_ms {
            Some(millis) => budget.with_time_budget(Duration::from_millis(millis)),
            None => budget,
        }
    }
}

impl Validate for SolverSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(MIN_TOLERANCE..=MAX_TOLERANCE).contains(&self.tolerance) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                format!("Tolerance must be between {MIN_TOLERANCE:e} and {MAX_TOLERANCE:e}"),
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                format!("Max iterations must be between 1 and {MAX_ITERATIONS}"),
                "valid_iterations",
            ));
        }

        if self.time_budget_ms == Some(0) {
            errors.push(ValidationError::with_rule(
                "time_budget_ms",
                "Time budget must be positive when set",
                "positive_time_budget",
            ));
        }

        errors
    }
}
