//! Per-expiry SABR calibration.

use curvekit_core::Date;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
use curvekit_math::optimization::{OptimizerKind, ParameterBounds};
use curvekit_math::solvers::SolveBudget;
use serde::{Deserialize, Serialize};

use super::{SabrParameters, SabrSmile};
use crate::error::{VolatilityError, VolatilityResult};
use crate::grid::{VolatilityGrid, VolatilitySlice};
use crate::surface::VolatilitySurface;

/// Fewest strikes that identify alpha, rho and nu.
const MIN_STRIKES: usize = 3;

/// Correlation is kept strictly inside (-1, 1).
const RHO_LIMIT: f64 = 0.9999;

/// Lower limit for alpha and nu.
const MIN_POSITIVE: f64 = 1e-8;

/// Starting vol-of-vol.
const INITIAL_NU: f64 = 0.3;

/// Settings for SABR calibration.
#[derive(Debug, Clone)]
pub struct SabrCalibrationConfig {
    /// Fixed CEV exponent.
    pub beta: f64,
    /// Least-squares method.
    pub optimizer: OptimizerKind,
    /// Tolerance on the sum of squared vol errors, iteration cap and limits.
    pub budget: SolveBudget,
    /// Interpolation of slice volatilities along expiry.
    pub expiry_method: InterpolationMethod,
    /// Extrapolation along expiry.
    pub expiry_extrapolation: Extrapolation,
}

impl Default for SabrCalibrationConfig {
    fn default() -> Self {
        Self {
            beta: 0.5,
            optimizer: OptimizerKind::LevenbergMarquardt,
            budget: SolveBudget::new(1e-16, 500),
            expiry_method: InterpolationMethod::Linear,
            expiry_extrapolation: Extrapolation::Flat,
        }
    }
}

impl SabrCalibrationConfig {
    /// Sets beta.
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the optimiser.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the budget.
    #[must_use]
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the interpolation along expiry.
    #[must_use]
    pub fn with_expiry_method(mut self, method: InterpolationMethod) -> Self {
        self.expiry_method = method;
        self
    }

    /// Sets the extrapolation along expiry.
    #[must_use]
    pub fn with_expiry_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.expiry_extrapolation = extrapolation;
        self
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` for beta outside `[0, 1]`, `Input` for a
    /// non-positive tolerance or a zero iteration cap.
    pub fn validate(&self) -> VolatilityResult<()> {
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(VolatilityError::invalid_parameters(format!(
                "beta must be in [0, 1], got {}",
                self.beta
            )));
        }
        if self.budget.tolerance.is_nan() || self.budget.tolerance <= 0.0 {
            return Err(VolatilityError::input("calibration tolerance must be positive"));
        }
        if self.budget.max_iterations == 0 {
            return Err(VolatilityError::input("calibration needs at least one iteration"));
        }
        Ok(())
    }
}

/// A successful slice fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrFit {
    /// Fitted parameters.
    pub params: SabrParameters,
    /// Root mean square of model minus market volatilities.
    pub rms_error: f64,
    /// Optimiser iterations used.
    pub iterations: u32,
}

/// Result of calibrating one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceOutcome {
    /// The slice fitted and is part of the surface.
    Calibrated(SabrFit),
    /// The slice failed and is skipped by queries.
    Failed(VolatilityError),
}

/// Calibration record for one expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct SabrCalibrationReport {
    /// Expiry of the slice.
    pub expiry: Date,
    /// Years to expiry.
    pub time: f64,
    /// Forward used for the slice.
    pub forward: f64,
    /// Number of strikes fitted.
    pub strikes: usize,
    /// Fit or failure.
    pub outcome: SliceOutcome,
}

impl SabrCalibrationReport {
    /// Returns true if the slice calibrated.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        matches!(self.outcome, SliceOutcome::Calibrated(_))
    }

    /// The fit, if the slice calibrated.
    #[must_use]
    pub fn fit(&self) -> Option<&SabrFit> {
        match &self.outcome {
            SliceOutcome::Calibrated(fit) => Some(fit),
            SliceOutcome::Failed(_) => None,
        }
    }
}

/// Fits a SABR smile to every expiry slice of a [`VolatilityGrid`].
///
/// Alpha, rho and nu are fitted by least squares on volatilities with beta
/// held fixed. A slice that fails is logged, recorded in its report and left
/// out of the surface; the other slices are unaffected.
#[derive(Debug, Clone, Default)]
pub struct SabrCalibrator {
    config: SabrCalibrationConfig,
}

impl SabrCalibrator {
    /// Creates a calibrator.
    #[must_use]
    pub fn new(config: SabrCalibrationConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &SabrCalibrationConfig {
        &self.config
    }

    /// Calibrates every slice and assembles the surface.
    ///
    /// # Errors
    ///
    /// A configuration error, or `NoCalibratedSlices` if every slice failed.
    pub fn calibrate(&self, grid: &VolatilityGrid) -> VolatilityResult<VolatilitySurface> {
        self.config.validate()?;

        let mut reports = Vec::with_capacity(grid.slices().len());
        let mut smiles = Vec::new();

        for slice in grid.slices() {
            let outcome = match self.calibrate_slice(slice) {
                Ok(fit) => {
                    tracing::debug!(
                        expiry = %slice.expiry(),
                        alpha = fit.params.alpha,
                        rho = fit.params.rho,
                        nu = fit.params.nu,
                        rms_error = fit.rms_error,
                        iterations = fit.iterations,
                        "Calibrated SABR slice"
                    );
                    smiles.push((slice.expiry(), SabrSmile::new(slice.forward(), slice.time(), fit.params)?));
                    SliceOutcome::Calibrated(fit)
                }
                Err(err) => {
                    tracing::warn!(expiry = %slice.expiry(), error = %err, "SABR slice failed to calibrate");
                    SliceOutcome::Failed(err)
                }
            };
            reports.push(SabrCalibrationReport {
                expiry: slice.expiry(),
                time: slice.time(),
                forward: slice.forward(),
                strikes: slice.strikes().len(),
                outcome,
            });
        }

        if smiles.is_empty() {
            return Err(VolatilityError::NoCalibratedSlices {
                attempted: reports.len(),
            });
        }

        tracing::info!(
            calibrated = smiles.len(),
            failed = reports.len() - smiles.len(),
            "SABR surface calibrated"
        );

        Ok(VolatilitySurface::new(
            grid.base_date(),
            grid.day_count(),
            self.config.expiry_method,
            self.config.expiry_extrapolation,
            smiles,
            reports,
        ))
    }

    /// Fits one slice.
    ///
    /// # Errors
    ///
    /// `SliceCalibration` for too few strikes, a non-positive forward or
    /// expiry, an optimiser error or a run that does not converge.
    pub fn calibrate_slice(&self, slice: &VolatilitySlice) -> VolatilityResult<SabrFit> {
        let expiry = slice.expiry();
        let fail = |reason: String| VolatilityError::slice_calibration(expiry, reason);

        if slice.strikes().len() < MIN_STRIKES {
            return Err(fail(format!(
                "{} strikes quoted, at least {MIN_STRIKES} needed",
                slice.strikes().len()
            )));
        }
        let (forward, t) = (slice.forward(), slice.time());
        if forward.is_nan() || forward <= 0.0 || t.is_nan() || t <= 0.0 {
            return Err(fail(format!("forward {forward} and expiry {t} must be positive")));
        }

        let beta = self.config.beta;
        let strikes = slice.strikes();
        let market = slice.volatilities();
        let residuals = |x: &[f64]| -> Vec<f64> {
            let params = SabrParameters {
                alpha: x[0],
                beta,
                rho: x[1],
                nu: x[2],
            };
            strikes
                .iter()
                .zip(market)
                .map(|(&k, &vol)| params.hagan_volatility(forward, k, t) - vol)
                .collect()
        };

        let initial = [slice.atm_volatility() * forward.powf(1.0 - beta), 0.0, INITIAL_NU];
        let bounds = ParameterBounds::new(
            vec![MIN_POSITIVE, -RHO_LIMIT, MIN_POSITIVE],
            vec![f64::INFINITY, RHO_LIMIT, f64::INFINITY],
        )
        .map_err(|e| fail(e.to_string()))?;

        let result = self
            .config
            .optimizer
            .solver()
            .minimize(&residuals, &initial, &bounds, &self.config.budget)
            .map_err(|e| fail(e.to_string()))?;

        if !result.converged {
            return Err(fail(format!(
                "optimiser stopped after {} iterations with objective {:.3e}",
                result.iterations, result.objective_value
            )));
        }

        let params = SabrParameters::new(result.parameters[0], beta, result.parameters[1], result.parameters[2])
            .map_err(|e| fail(e.to_string()))?;
        let rms_error = (result.objective_value / strikes.len() as f64).sqrt();

        Ok(SabrFit {
            params,
            rms_error,
            iterations: result.iterations,
        })
    }
}
