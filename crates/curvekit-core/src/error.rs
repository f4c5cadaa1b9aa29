//! Error types for the core date and rate utilities.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, tenors, day counts and compounding formulas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string could not be parsed or is out of range.
    #[error("Invalid tenor: {message}")]
    InvalidTenor {
        /// Description of the problem.
        message: String,
    },

    /// A formula was evaluated outside its mathematical domain
    /// (logarithm of a non-positive discount factor, zero-length period).
    #[error("Arithmetic domain error: {reason}")]
    ArithmeticDomain {
        /// Description of the violated domain.
        reason: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCount {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(message: impl Into<String>) -> Self {
        Self::InvalidTenor {
            message: message.into(),
        }
    }

    /// Creates an arithmetic domain error.
    #[must_use]
    pub fn arithmetic_domain(reason: impl Into<String>) -> Self {
        Self::ArithmeticDomain {
            reason: reason.into(),
        }
    }

    /// Creates a day count error.
    #[must_use]
    pub fn day_count(reason: impl Into<String>) -> Self {
        Self::DayCount {
            reason: reason.into(),
        }
    }
}
