//! Error types for volatility construction and SABR calibration.

use curvekit_core::{CoreError, Date};
use curvekit_curves::CurveError;
use curvekit_math::MathError;
use thiserror::Error;

/// Error types for volatility operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolatilityError {
    /// The option set or a construction argument is invalid.
    #[error("Invalid input: {reason}")]
    Input {
        /// Description of the problem.
        reason: String,
    },

    /// SABR parameters outside their domain.
    #[error("Invalid SABR parameters: {reason}")]
    InvalidParameters {
        /// Description of the violated bound.
        reason: String,
    },

    /// One expiry slice could not be fitted.
    #[error("Calibration of the {expiry} slice failed: {reason}")]
    SliceCalibration {
        /// Expiry of the slice.
        expiry: Date,
        /// Description of the failure.
        reason: String,
    },

    /// Every slice failed, so no surface can be built.
    #[error("No expiry slice calibrated ({attempted} attempted)")]
    NoCalibratedSlices {
        /// Number of slices tried.
        attempted: usize,
    },

    /// Term structure error.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Numerical error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl VolatilityError {
    /// Creates an input error.
    #[must_use]
    pub fn input(reason: impl Into<String>) -> Self {
        Self::Input {
            reason: reason.into(),
        }
    }

    /// Creates an invalid parameters error.
    #[must_use]
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    /// Creates a slice calibration error.
    #[must_use]
    pub fn slice_calibration(expiry: Date, reason: impl Into<String>) -> Self {
        Self::SliceCalibration {
            expiry,
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for VolatilityError {
    fn from(err: CoreError) -> Self {
        Self::input(err.to_string())
    }
}

/// Result type for volatility operations.
pub type VolatilityResult<T> = Result<T, VolatilityError>;
