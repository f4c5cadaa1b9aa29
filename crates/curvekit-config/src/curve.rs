//! Curve build configuration.
//!
//! A [`CurveBuildConfig`] names the kind of curve to bootstrap and the
//! numerical settings of the build. It converts into the typed
//! [`BootstrapConfig`] consumed by the bootstrapper.

use serde::{Deserialize, Serialize};

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Compounding;
use curvekit_curves::repricing::tolerances;
use curvekit_curves::BootstrapConfig;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};

use crate::error::{ConfigResult, Validate, ValidationError};
use crate::solver::SolverSettings;

// =============================================================================
// CURVE KIND
// =============================================================================

/// Kind of value a curve build solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveKind {
    /// Discount factors anchored at 1 on the base date.
    #[default]
    Discount,
    /// Zero rates under the configured compounding.
    Zero,
    /// Caplet volatilities from caps and floors.
    CapletVolatility,
    /// Prices of directly quoted futures.
    Price,
    /// Outright FX forwards anchored at the configured spot.
    FxForward,
}

impl CurveKind {
    /// Returns whether the curve's values are strictly positive.
    pub fn is_positive(&self) -> bool {
        !matches!(self, Self::Zero)
    }
}

// =============================================================================
// CURVE BUILD CONFIGURATION
// =============================================================================

/// Configuration for one curve build.
///
/// Unset interpolation and extrapolation fall back to the defaults of the
/// curve kind.
///
/// # Example
///
/// ```rust
/// use curvekit_config::{CurveBuildConfig, CurveKind, Validate};
/// use curvekit_math::interpolation::InterpolationMethod;
///
/// let config = CurveBuildConfig::new(CurveKind::Discount)
///     .with_interpolation(InterpolationMethod::CubicSpline);
/// assert!(config.is_valid());
///
/// let bootstrap = config.to_bootstrap_config().unwrap();
/// assert_eq!(bootstrap.method, InterpolationMethod::CubicSpline);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveBuildConfig {
    /// Description of this configuration.
    pub description: Option<String>,

    /// Kind of curve.
    pub kind: CurveKind,

    /// Interpolation between knots.
    pub interpolation: Option<InterpolationMethod>,

    /// Extrapolation beyond the knots.
    pub extrapolation: Option<Extrapolation>,

    /// Day count mapping dates to times.
    pub day_count: DayCountConvention,

    /// Compounding of zero curves.
    pub compounding: Compounding,

    /// Spot rate of FX forward curves.
    pub fx_spot: Option<f64>,

    /// Maximum sweeps for spline interpolation.
    pub max_sweeps: u32,

    /// Largest knot change accepted as settled between sweeps.
    pub sweep_tolerance: f64,

    /// Tolerance of the repricing check.
    pub repricing_tolerance: f64,

    /// Root-finder settings for each knot.
    pub solver: SolverSettings,
}

impl Default for CurveBuildConfig {
    fn default() -> Self {
        Self::new(CurveKind::default())
    }
}

impl CurveBuildConfig {
    /// Creates a configuration with default settings for `kind`.
    pub fn new(kind: CurveKind) -> Self {
        Self {
            description: None,
            kind,
            interpolation: None,
            extrapolation: None,
            day_count: DayCountConvention::Act365Fixed,
            compounding: Compounding::Continuous,
            fx_spot: None,
            max_sweeps: 50,
            sweep_tolerance: 1e-10,
            repricing_tolerance: tolerances::STRICT,
            solver: SolverSettings::default(),
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set interpolation.
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = Some(method);
        self
    }

    /// Builder method to set extrapolation.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = Some(extrapolation);
        self
    }

    /// Builder method to set day count.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Builder method to set compounding.
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    /// Builder method to set the FX spot rate.
    pub fn with_fx_spot(mut self, spot: f64) -> Self {
        self.fx_spot = Some(spot);
        self
    }

    /// Builder method to set solver settings.
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Builder method to set the repricing tolerance.
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    fn preset(&self) -> BootstrapConfig {
        match self.kind {
            CurveKind::Discount => BootstrapConfig::discount_curve(),
            CurveKind::Zero => BootstrapConfig::zero_curve(self.compounding),
            CurveKind::CapletVolatility => BootstrapConfig::caplet_volatility_curve(),
            CurveKind::Price => BootstrapConfig::price_curve(),
            CurveKind::FxForward => BootstrapConfig::fx_forward_curve(self.fx_spot.unwrap_or(1.0)),
        }
    }

    /// Interpolation used by the build, after defaults.
    pub fn effective_interpolation(&self) -> InterpolationMethod {
        self.interpolation.unwrap_or(self.preset().method)
    }

    /// Validates and converts into a typed bootstrap configuration.
    ///
    /// # Errors
    ///
    /// `Validation` or `MultipleValidationErrors` if the settings are invalid.
    pub fn to_bootstrap_config(&self) -> ConfigResult<BootstrapConfig> {
        self.validate_or_error()?;

        let preset = self.preset();
        let mut config = BootstrapConfig {
            max_sweeps: self.max_sweeps,
            sweep_tolerance: self.sweep_tolerance,
            ..preset
        }
        .with_method(self.effective_interpolation())
        .with_day_count(self.day_count)
        .with_solver(self.solver.root_solver)
        .with_budget(self.solver.to_budget())
        .with_repricing_tolerance(self.repricing_tolerance);

        if let Some(extrapolation) = self.extrapolation {
            config = config.with_extrapolation(extrapolation);
        }
        Ok(config)
    }
}

impl Validate for CurveBuildConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .solver
            .validate()
            .into_iter()
            .map(|e| e.nested("solver"))
            .collect();

        let method = self.effective_interpolation();
        if method.requires_positive() && !self.kind.is_positive() {
            errors.push(ValidationError::with_rule(
                "interpolation",
                format!("{method} interpolation needs positive values; {:?} curves can go negative", self.kind),
                "positive_values",
            ));
        }

        if self.kind == CurveKind::FxForward {
            match self.fx_spot {
                None => errors.push(ValidationError::with_rule(
                    "fx_spot",
                    "FX forward curves need a spot rate",
                    "required",
                )),
                Some(spot) if spot.is_nan() || spot <= 0.0 => errors.push(ValidationError::with_rule(
                    "fx_spot",
                    format!("FX spot must be positive, got {spot}"),
                    "positive_spot",
                )),
                Some(_) => {}
            }
        }

        if !method.is_local() && self.max_sweeps == 0 {
            errors.push(ValidationError::with_rule(
                "max_sweeps",
                format!("{method} interpolation needs at least one sweep"),
                "min_sweeps",
            ));
        }

        if self.sweep_tolerance.is_nan() || self.sweep_tolerance <= 0.0 {
            errors.push(ValidationError::with_rule(
                "sweep_tolerance",
                "Sweep tolerance must be positive",
                "positive_tolerance",
            ));
        }

        if self.repricing_tolerance.is_nan() || self.repricing_tolerance <= 0.0 {
            errors.push(ValidationError::with_rule(
                "repricing_tolerance",
                "Repricing tolerance must be positive",
                "positive_tolerance",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvekit_curves::CurveValueType;

    #[test]
    fn test_kind_presets() {
        let discount = CurveBuildConfig::new(CurveKind::Discount).to_bootstrap_config().unwrap();
        assert_eq!(discount.value_type, CurveValueType::DiscountFactor);
        assert_eq!(discount.method, InterpolationMethod::LogLinear);
        assert_eq!(discount.anchor, Some(1.0));

        let zero = CurveBuildConfig::new(CurveKind::Zero)
            .with_compounding(Compounding::SemiAnnual)
            .to_bootstrap_config()
            .unwrap();
        assert_eq!(
            zero.value_type,
            CurveValueType::ZeroRate {
                compounding: Compounding::SemiAnnual
            }
        );
        assert_eq!(zero.method, InterpolationMethod::Linear);
    }

    #[test]
    fn test_overrides_applied() {
        let config = CurveBuildConfig::new(CurveKind::Price)
            .with_extrapolation(Extrapolation::None)
            .with_day_count(DayCountConvention::Act360)
            .with_solver(SolverSettings::new(1e-9, 40))
            .to_bootstrap_config()
            .unwrap();
        assert_eq!(config.extrapolation, Extrapolation::None);
        assert_eq!(config.day_count, DayCountConvention::Act360);
        assert_eq!(config.budget.max_iterations, 40);
    }

    #[test]
    fn test_log_linear_zero_curve_rejected() {
        let config = CurveBuildConfig::new(CurveKind::Zero).with_interpolation(InterpolationMethod::LogLinear);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "interpolation");
        assert!(config.to_bootstrap_config().is_err());
    }

    #[test]
    fn test_solver_errors_are_nested() {
        let config = CurveBuildConfig::new(CurveKind::Discount).with_solver(SolverSettings::new(0.0, 10));
        assert_eq!(config.validate()[0].field, "solver.tolerance");
    }

    #[test]
    fn test_fx_forward_anchored_at_spot() {
        let config = CurveBuildConfig::new(CurveKind::FxForward)
            .with_fx_spot(1.0850)
            .to_bootstrap_config()
            .unwrap();
        assert_eq!(config.value_type, CurveValueType::FxForward);
        assert_eq!(config.anchor, Some(1.0850));
    }

    #[test]
    fn test_fx_forward_needs_positive_spot() {
        let missing = CurveBuildConfig::new(CurveKind::FxForward);
        assert_eq!(missing.validate()[0].field, "fx_spot");

        let negative = CurveBuildConfig::new(CurveKind::FxForward).with_fx_spot(-1.0);
        assert!(negative.to_bootstrap_config().is_err());
    }
}
