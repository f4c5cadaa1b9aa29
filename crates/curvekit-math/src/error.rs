//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding or optimisation failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Matrix is singular (not invertible).
    #[error("Singular matrix: cannot invert")]
    SingularMatrix,

    /// Two interpolation knots share the same abscissa.
    #[error("Duplicate abscissa: {x}")]
    DuplicateAbscissa {
        /// The repeated abscissa.
        x: f64,
    },

    /// Interpolation abscissas are not in ascending order.
    #[error("Abscissas not ascending at index {index}: {value} follows {previous}")]
    NotAscending {
        /// Index of the offending knot.
        index: usize,
        /// The preceding abscissa.
        previous: f64,
        /// The offending abscissa.
        value: f64,
    },

    /// Interpolation point is outside the valid range.
    #[error("Out of range: {x} is outside [{min}, {max}] and extrapolation is disabled")]
    OutOfRange {
        /// The query point.
        x: f64,
        /// Minimum valid value.
        min: f64,
        /// Maximum valid value.
        max: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// A numerical routine ran past its wall-clock budget.
    #[error("Time budget exhausted after {iterations} iterations")]
    BudgetExhausted {
        /// Iterations completed before the budget ran out.
        iterations: u32,
    },

    /// A numerical routine was cancelled by its caller.
    #[error("Cancelled after {iterations} iterations")]
    Cancelled {
        /// Iterations completed before cancellation.
        iterations: u32,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for failures of an iterative routine (non-convergence,
    /// budget, cancellation, bad bracket) as opposed to bad input.
    #[must_use]
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. }
                | Self::InvalidBracket { .. }
                | Self::DivisionByZero { .. }
                | Self::BudgetExhausted { .. }
                | Self::Cancelled { .. }
                | Self::SingularMatrix
        )
    }
}
