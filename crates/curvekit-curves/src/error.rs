//! Error types for curve construction and querying.

use curvekit_core::CoreError;
use curvekit_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// The instrument set or a construction argument is invalid.
    #[error("Invalid input: {reason}")]
    Input {
        /// Description of the problem.
        reason: String,
    },

    /// A formula was evaluated outside its domain.
    #[error("Arithmetic domain error: {reason}")]
    ArithmeticDomain {
        /// Description of the violated domain.
        reason: String,
    },

    /// An instrument could not be fitted.
    #[error("Calibration failed for {instrument}: {reason}")]
    CalibrationFailure {
        /// Id of the offending instrument.
        instrument: String,
        /// Description of the failure.
        reason: String,
    },

    /// Two knots share an abscissa.
    #[error("Duplicate abscissa: {x}")]
    DuplicateAbscissa {
        /// The repeated abscissa (years from the base date).
        x: f64,
    },

    /// A query fell outside the curve and extrapolation is disabled.
    #[error("Query at t={t:.6} outside curve range [{min:.6}, {max:.6}]")]
    OutOfRange {
        /// The requested time in years.
        t: f64,
        /// First knot time.
        min: f64,
        /// Last knot time.
        max: f64,
    },

    /// Not enough knots to build an interpolated curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// The curve holds values of the wrong kind for the requested operation.
    #[error("Incompatible value type: expected {expected}, got {got}")]
    IncompatibleValueType {
        /// Expected value type.
        expected: String,
        /// Actual value type.
        got: String,
    },

    /// Strict validation found instruments the curve does not reprice.
    #[error("Repricing failed for {failed_count} instruments (max error: {max_error:.2e}): {instruments:?}")]
    RepricingFailed {
        /// Number of failing instruments.
        failed_count: usize,
        /// Largest absolute quote error.
        max_error: f64,
        /// Ids of the failing instruments.
        instruments: Vec<String>,
    },

    /// Any other numerical failure.
    #[error("Math error: {0}")]
    Math(MathError),
}

impl CurveError {
    /// Creates an input error.
    #[must_use]
    pub fn input(reason: impl Into<String>) -> Self {
        Self::Input {
            reason: reason.into(),
        }
    }

    /// Creates an arithmetic domain error.
    #[must_use]
    pub fn arithmetic_domain(reason: impl Into<String>) -> Self {
        Self::ArithmeticDomain {
            reason: reason.into(),
        }
    }

    /// Creates a calibration failure for `instrument`.
    #[must_use]
    pub fn calibration_failed(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates an incompatible value type error.
    #[must_use]
    pub fn incompatible_value_type(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::IncompatibleValueType {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates a repricing failure error.
    #[must_use]
    pub fn repricing_failed(failed_count: usize, max_error: f64, instruments: Vec<String>) -> Self {
        Self::RepricingFailed {
            failed_count,
            max_error,
            instruments,
        }
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DuplicateAbscissa { x } => Self::DuplicateAbscissa { x },
            MathError::OutOfRange { x, min, max } => Self::OutOfRange { t: x, min, max },
            MathError::InsufficientData { required, actual } => Self::InsufficientPoints {
                required,
                got: actual,
            },
            other => Self::Math(other),
        }
    }
}

impl From<CoreError> for CurveError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ArithmeticDomain { reason } => Self::ArithmeticDomain { reason },
            other => Self::input(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_failure_names_instrument() {
        let err = CurveError::calibration_failed("SWAP-10Y", "did not converge");
        let msg = err.to_string();
        assert!(msg.contains("SWAP-10Y"));
        assert!(msg.contains("did not converge"));
    }

    #[test]
    fn test_math_errors_map_onto_taxonomy() {
        assert_eq!(
            CurveError::from(MathError::DuplicateAbscissa { x: 1.0 }),
            CurveError::DuplicateAbscissa { x: 1.0 }
        );
        assert!(matches!(
            CurveError::from(MathError::OutOfRange {
                x: 3.0,
                min: 1.0,
                max: 2.0
            }),
            CurveError::OutOfRange { .. }
        ));
        assert!(matches!(
            CurveError::from(MathError::SingularMatrix),
            CurveError::Math(MathError::SingularMatrix)
        ));
    }

    #[test]
    fn test_core_domain_error_maps() {
        let err = CurveError::from(CoreError::arithmetic_domain("ln(0)"));
        assert_eq!(err, CurveError::arithmetic_domain("ln(0)"));
    }
}
