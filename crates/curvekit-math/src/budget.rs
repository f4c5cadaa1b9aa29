//! Iteration budgets and cooperative cancellation for numerical routines.
//!
//! Every iterative routine in this crate takes a [`SolveBudget`]. Besides the
//! tolerance and iteration cap, a budget can carry a wall-clock limit and a
//! [`CancellationToken`]; both are checked once per iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{MathError, MathResult};

/// Default tolerance for iterative routines.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for iterative routines.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Shared flag used to ask a running computation to stop.
///
/// Clones share the same flag, so one clone can be handed to a worker while
/// another stays with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tolerance, iteration cap and optional time/cancellation limits.
#[derive(Debug, Clone)]
pub struct SolveBudget {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Optional wall-clock limit per solve.
    pub time_budget: Option<Duration>,
    /// Optional cancellation flag.
    pub cancellation: Option<CancellationToken>,
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_budget: None,
            cancellation: None,
        }
    }
}

impl SolveBudget {
    /// Creates a budget with the given tolerance and iteration cap.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets a wall-clock limit.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Starts the clock for one solve.
    #[must_use]
    pub fn start(&self) -> BudgetClock<'_> {
        BudgetClock {
            budget: self,
            started: Instant::now(),
        }
    }
}

/// A running [`SolveBudget`], created by [`SolveBudget::start`].
#[derive(Debug)]
pub struct BudgetClock<'a> {
    budget: &'a SolveBudget,
    started: Instant,
}

impl BudgetClock<'_> {
    /// Fails if the solve was cancelled or ran out of time.
    ///
    /// `iteration` is the number of iterations already completed; it is
    /// reported in the error.
    pub fn check(&self, iteration: u32) -> MathResult<()> {
        if let Some(token) = &self.budget.cancellation {
            if token.is_cancelled() {
                return Err(MathError::Cancelled {
                    iterations: iteration,
                });
            }
        }
        if let Some(limit) = self.budget.time_budget {
            if self.started.elapsed() > limit {
                return Err(MathError::BudgetExhausted {
                    iterations: iteration,
                });
            }
        }
        Ok(())
    }

    /// Time elapsed since the clock started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
