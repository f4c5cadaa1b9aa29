//! Linear algebra utilities built on `nalgebra`.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Solves `A x = b` for a square matrix.
///
/// Symmetric positive-definite systems (normal equations) take the Cholesky
/// path; anything else falls back to LU with partial pivoting.
///
/// # Errors
///
/// `InvalidInput` on mismatched dimensions, `SingularMatrix` if the system
/// has no unique solution.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            n,
            a.ncols()
        )));
    }
    if n != b.len() {
        return Err(MathError::invalid_input(format!(
            "right-hand side has {} rows, matrix has {n}",
            b.len()
        )));
    }

    if let Some(cholesky) = a.clone().cholesky() {
        let x = cholesky.solve(b);
        if x.iter().all(|v| v.is_finite()) {
            return Ok(x);
        }
    }

    a.clone()
        .lu()
        .solve(b)
        .filter(|x| x.iter().all(|v| v.is_finite()))
        .ok_or(MathError::SingularMatrix)
}

/// Forms the normal equations `(JᵀJ, Jᵀr)` of a least-squares problem.
#[must_use]
pub fn normal_equations(jacobian: &DMatrix<f64>, residuals: &DVector<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let jt = jacobian.transpose();
    (&jt * jacobian, &jt * residuals)
}
