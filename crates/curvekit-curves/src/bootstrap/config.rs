//! Bootstrap configuration.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Compounding;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
use curvekit_math::solvers::{RootSolverKind, SolveBudget};

use crate::error::{CurveError, CurveResult};
use crate::repricing::tolerances;
use crate::value_type::CurveValueType;

/// Settings for one curve build.
///
/// The presets cover the common curve kinds; adjust them with the `with_*`
/// methods.
///
/// # Example
///
/// ```rust
/// use curvekit_curves::bootstrap::BootstrapConfig;
/// use curvekit_math::interpolation::InterpolationMethod;
///
/// let config = BootstrapConfig::discount_curve().with_method(InterpolationMethod::CubicSpline);
/// assert_eq!(config.anchor, Some(1.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Kind of value solved at each knot.
    pub value_type: CurveValueType,
    /// Interpolation between knots.
    pub method: InterpolationMethod,
    /// Extrapolation of the finished curve.
    pub extrapolation: Extrapolation,
    /// Day count mapping knot dates to times.
    pub day_count: DayCountConvention,
    /// Value inserted at the base date before any asset, if any.
    pub anchor: Option<f64>,
    /// Root finder for iteratively solved knots.
    pub solver: RootSolverKind,
    /// Tolerance, iteration cap and limits for each root search.
    pub budget: SolveBudget,
    /// Maximum full sweeps for non-local interpolation.
    pub max_sweeps: u32,
    /// Largest knot change accepted as settled between sweeps.
    pub sweep_tolerance: f64,
    /// Tolerance of the repricing check, in quote units.
    pub repricing_tolerance: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::discount_curve()
    }
}

impl BootstrapConfig {
    fn with_value_type(value_type: CurveValueType) -> Self {
        Self {
            value_type,
            method: InterpolationMethod::Linear,
            extrapolation: Extrapolation::Flat,
            day_count: DayCountConvention::Act365Fixed,
            anchor: None,
            solver: RootSolverKind::Hybrid,
            budget: SolveBudget::new(1e-12, 100),
            max_sweeps: 50,
            sweep_tolerance: 1e-10,
            repricing_tolerance: tolerances::STRICT,
        }
    }

    /// Log-linear discount factors anchored at `1.0` on the base date.
    #[must_use]
    pub fn discount_curve() -> Self {
        Self {
            method: InterpolationMethod::LogLinear,
            extrapolation: Extrapolation::Linear,
            anchor: Some(1.0),
            ..Self::with_value_type(CurveValueType::DiscountFactor)
        }
    }

    /// Linearly interpolated zero rates under `compounding`.
    #[must_use]
    pub fn zero_curve(compounding: Compounding) -> Self {
        Self {
            extrapolation: Extrapolation::Linear,
            ..Self::with_value_type(CurveValueType::ZeroRate { compounding })
        }
    }

    /// Caplet volatilities, flat beyond the first and last cap.
    #[must_use]
    pub fn caplet_volatility_curve() -> Self {
        Self::with_value_type(CurveValueType::Volatility)
    }

    /// Prices of directly quoted futures.
    #[must_use]
    pub fn price_curve() -> Self {
        Self::with_value_type(CurveValueType::Price)
    }

    /// Outright FX forwards, anchored at `spot` on the base date.
    #[must_use]
    pub fn fx_forward_curve(spot: f64) -> Self {
        Self {
            anchor: Some(spot),
            ..Self::with_value_type(CurveValueType::FxForward)
        }
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets or clears the base-date anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Option<f64>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the root finder.
    #[must_use]
    pub fn with_solver(mut self, solver: RootSolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the solve budget.
    #[must_use]
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the repricing tolerance.
    #[must_use]
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    /// Checks the settings for consistency.
    ///
    /// # Errors
    ///
    /// `Input` describing the first problem found.
    pub fn validate(&self) -> CurveResult<()> {
        if let CurveValueType::ForwardRate { .. } = self.value_type {
            return Err(CurveError::input(
                "forward curves are derived from discount curves, not bootstrapped",
            ));
        }
        if self.budget.tolerance.is_nan() || self.budget.tolerance <= 0.0 {
            return Err(CurveError::input(format!(
                "solver tolerance must be positive, got {}",
                self.budget.tolerance
            )));
        }
        if self.budget.max_iterations == 0 {
            return Err(CurveError::input("solver needs at least one iteration"));
        }
        if !self.method.is_local() && self.max_sweeps == 0 {
            return Err(CurveError::input(format!(
                "{} interpolation needs at least one sweep",
                self.method
            )));
        }
        if self.repricing_tolerance.is_nan() || self.repricing_tolerance <= 0.0 {
            return Err(CurveError::input(format!(
                "repricing tolerance must be positive, got {}",
                self.repricing_tolerance
            )));
        }
        if let Some(anchor) = self.anchor {
            if self.method.requires_positive() && anchor <= 0.0 {
                return Err(CurveError::input(format!(
                    "anchor {anchor} is not positive under {} interpolation",
                    self.method
                )));
            }
        }
        Ok(())
    }

    /// Bracket handed to the root finder for a knot value.
    pub(crate) fn solve_bounds(&self) -> Option<(f64, f64)> {
        match self.value_type {
            CurveValueType::DiscountFactor => Some((1e-6, 2.0)),
            CurveValueType::ZeroRate { .. } | CurveValueType::ForwardRate { .. } => Some((-0.5, 1.0)),
            CurveValueType::Volatility => Some((1e-6, 5.0)),
            CurveValueType::Price | CurveValueType::FxForward => None,
        }
    }

    /// Starting point of a root search at time `t`.
    pub(crate) fn initial_guess(&self, t: f64, previous: Option<f64>) -> f64 {
        match (self.value_type, previous) {
            (CurveValueType::DiscountFactor, _) => (-0.03 * t).exp(),
            (_, Some(value)) => value,
            (CurveValueType::Volatility, None) => 0.2,
            (CurveValueType::Price | CurveValueType::FxForward, None) => 1.0,
            (_, None) => 0.03,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvekit_core::types::Tenor;

    #[test]
    fn test_presets_validate() {
        for config in [
            BootstrapConfig::discount_curve(),
            BootstrapConfig::zero_curve(Compounding::Continuous),
            BootstrapConfig::caplet_volatility_curve(),
            BootstrapConfig::price_curve(),
            BootstrapConfig::fx_forward_curve(1.0850),
        ] {
            assert!(config.validate().is_ok(), "{:?}", config.value_type);
        }
    }

    #[test]
    fn test_forward_curves_not_bootstrapped() {
        let mut config = BootstrapConfig::price_curve();
        config.value_type = CurveValueType::ForwardRate {
            tenor: Tenor::months(3),
        };
        assert!(matches!(config.validate(), Err(CurveError::Input { .. })));
    }

    #[test]
    fn test_non_positive_anchor_rejected_for_log_linear() {
        let config = BootstrapConfig::discount_curve().with_anchor(Some(0.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let config =
            BootstrapConfig::discount_curve().with_budget(SolveBudget::new(0.0, 100));
        assert!(config.validate().is_err());
    }
}
