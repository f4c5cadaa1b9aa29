//! Volatility surface build configuration.

use serde::{Deserialize, Serialize};

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
use curvekit_math::optimization::OptimizerKind;
use curvekit_volatility::{SabrCalibrationConfig, VolatilitySurfaceBootstrapper};

use crate::error::{ConfigResult, Validate, ValidationError};
use crate::solver::SolverSettings;

/// Configuration for a market grid and its SABR calibration.
///
/// `premium_solver` governs the inversion of premium quotes to
/// volatilities; `calibration` governs the per-expiry least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceBuildConfig {
    /// Description of this configuration.
    pub description: Option<String>,

    /// Fixed SABR beta.
    pub beta: f64,

    /// Least-squares method for the SABR fit.
    pub optimizer: OptimizerKind,

    /// Interpolation along expiry.
    pub expiry_interpolation: InterpolationMethod,

    /// Extrapolation along expiry.
    pub extrapolation: Extrapolation,

    /// Day count mapping expiries to times.
    pub day_count: DayCountConvention,

    /// Settings for the premium to volatility inversion.
    pub premium_solver: SolverSettings,

    /// Settings for the SABR fit.
    pub calibration: SolverSettings,
}

impl Default for SurfaceBuildConfig {
    fn default() -> Self {
        Self {
            description: None,
            beta: 0.5,
            optimizer: OptimizerKind::LevenbergMarquardt,
            expiry_interpolation: InterpolationMethod::Linear,
            extrapolation: Extrapolation::Flat,
            day_count: DayCountConvention::Act365Fixed,
            premium_solver: SolverSettings::default(),
            calibration: SolverSettings::new(1e-16, 500),
        }
    }
}

impl SurfaceBuildConfig {
    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set beta.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Builder method to set the optimiser.
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Builder method to set interpolation along expiry.
    pub fn with_expiry_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.expiry_interpolation = method;
        self
    }

    /// Builder method to set calibration settings.
    pub fn with_calibration(mut self, calibration: SolverSettings) -> Self {
        self.calibration = calibration;
        self
    }

    /// Validates and converts into a typed calibration configuration.
    ///
    /// # Errors
    ///
    /// `Validation` or `MultipleValidationErrors` if the settings are invalid.
    pub fn to_calibration_config(&self) -> ConfigResult<SabrCalibrationConfig> {
        self.validate_or_error()?;
        Ok(SabrCalibrationConfig::default()
            .with_beta(self.beta)
            .with_optimizer(self.optimizer)
            .with_budget(self.calibration.to_budget())
            .with_expiry_method(self.expiry_interpolation)
            .with_expiry_extrapolation(self.extrapolation))
    }

    /// Validates and creates a grid bootstrapper at `base_date`.
    ///
    /// # Errors
    ///
    /// `Validation` or `MultipleValidationErrors` if the settings are invalid.
    pub fn grid_bootstrapper(&self, base_date: Date) -> ConfigResult<VolatilitySurfaceBootstrapper> {
        self.validate_or_error()?;
        Ok(VolatilitySurfaceBootstrapper::new(base_date)
            .with_day_count(self.day_count)
            .with_expiry_method(self.expiry_interpolation)
            .with_extrapolation(self.extrapolation)
            .with_budget(self.premium_solver.to_budget()))
    }
}

impl Validate for SurfaceBuildConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.beta) {
            errors.push(ValidationError::with_rule(
                "beta",
                format!("Beta must be between 0 and 1, got {}", self.beta),
                "unit_interval",
            ));
        }

        if self.expiry_interpolation == InterpolationMethod::CubicSpline {
            errors.push(ValidationError::with_rule(
                "expiry_interpolation",
                "Expiry interpolation must be Linear or LogLinear",
                "local_expiry_interpolation",
            ));
        }

        errors.extend(self.premium_solver.validate().into_iter().map(|e| e.nested("premium_solver")));
        errors.extend(self.calibration.validate().into_iter().map(|e| e.nested("calibration")));

        errors
    }
}
