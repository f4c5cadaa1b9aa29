//! # Curvekit Math
//!
//! Numerical building blocks for curve and surface construction.
//!
//! - **Interpolation**: linear, log-linear and natural cubic spline over
//!   strictly ascending knots, with a selectable extrapolation policy, plus a
//!   two-pass surface interpolator
//! - **Solvers**: Newton-Raphson, Brent and a Newton/Brent hybrid
//! - **Optimization**: Levenberg-Marquardt and Nelder-Mead least squares with
//!   box bounds
//! - **Budgets**: iteration caps, wall-clock limits and cancellation shared by
//!   every iterative routine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::float_cmp)]

pub mod budget;
pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::budget::{CancellationToken, SolveBudget};
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, Extrapolation, InterpolationMethod, Interpolator, LinearInterpolator,
        LogLinearInterpolator, Point2D, SurfaceInterpolator,
    };
    pub use crate::optimization::{
        LeastSquaresSolver, LevenbergMarquardt, NelderMead, OptimizationResult, OptimizerKind,
        ParameterBounds,
    };
    pub use crate::solvers::{
        brent, hybrid, hybrid_numerical, newton_raphson, newton_raphson_numerical, BrentSolver,
        HybridSolver, NewtonSolver, RootSolverKind, Solver, SolverResult,
    };
}

pub use budget::{CancellationToken, SolveBudget};
pub use error::{MathError, MathResult};
