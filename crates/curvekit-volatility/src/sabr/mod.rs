//! SABR stochastic volatility smiles.
//!
//! The forward follows a CEV process whose volatility is itself lognormal:
//!
//! ```text
//! dF = σ F^β dW₁
//! dσ = ν σ dW₂
//! dW₁ dW₂ = ρ dt
//! ```
//!
//! Black volatilities come from Hagan et al. (2002), "Managing Smile Risk".

mod calibration;

pub use calibration::{
    SabrCalibrationConfig, SabrCalibrationReport, SabrCalibrator, SabrFit, SliceOutcome,
};

use serde::{Deserialize, Serialize};

use crate::error::{VolatilityError, VolatilityResult};

/// Below this |z| the ratio z/x(z) is taken from its Taylor expansion.
const Z_EXPANSION_THRESHOLD: f64 = 1e-6;

/// SABR model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrParameters {
    /// Initial volatility level, `α > 0`.
    pub alpha: f64,
    /// CEV exponent, `β ∈ [0, 1]`.
    pub beta: f64,
    /// Forward/volatility correlation, `ρ ∈ (-1, 1)`.
    pub rho: f64,
    /// Volatility of volatility, `ν ≥ 0`.
    pub nu: f64,
}

impl SabrParameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if any parameter is outside its domain.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> VolatilityResult<Self> {
        let params = Self { alpha, beta, rho, nu };
        params.validate()?;
        Ok(params)
    }

    /// Checks every parameter against its domain.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` naming the first offending parameter.
    pub fn validate(&self) -> VolatilityResult<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(VolatilityError::invalid_parameters(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(VolatilityError::invalid_parameters(format!(
                "beta must be in [0, 1], got {}",
                self.beta
            )));
        }
        if self.rho.is_nan() || self.rho.abs() >= 1.0 {
            return Err(VolatilityError::invalid_parameters(format!(
                "rho must be in (-1, 1), got {}",
                self.rho
            )));
        }
        if !self.nu.is_finite() || self.nu < 0.0 {
            return Err(VolatilityError::invalid_parameters(format!(
                "nu must be non-negative, got {}",
                self.nu
            )));
        }
        Ok(())
    }

    /// Hagan lognormal volatility for `forward`, `strike` and `expiry` in
    /// years. Inputs are not validated; callers check positivity.
    #[must_use]
    pub fn hagan_volatility(&self, forward: f64, strike: f64, expiry: f64) -> f64 {
        let Self { alpha, beta, rho, nu } = *self;
        let omb = 1.0 - beta;
        let omb_sq = omb * omb;

        let log_moneyness = (forward / strike).ln();
        let lm_sq = log_moneyness * log_moneyness;
        let fk = forward * strike;
        let fk_mid = fk.powf(omb / 2.0);

        let denominator = fk_mid * (1.0 + omb_sq / 24.0 * lm_sq + omb_sq * omb_sq / 1920.0 * lm_sq * lm_sq);

        let z = if nu == 0.0 {
            0.0
        } else {
            nu / alpha * fk_mid * log_moneyness
        };
        let z_over_x = if z.abs() < Z_EXPANSION_THRESHOLD {
            1.0 - 0.5 * rho * z + (2.0 - 3.0 * rho * rho) / 12.0 * z * z
        } else {
            let root = (1.0 - 2.0 * rho * z + z * z).sqrt();
            z / ((root + z - rho) / (1.0 - rho)).ln()
        };

        let correction = 1.0
            + expiry
                * (omb_sq / 24.0 * alpha * alpha / fk.powf(omb)
                    + 0.25 * rho * beta * nu * alpha / fk_mid
                    + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu);

        alpha / denominator * z_over_x * correction
    }
}

/// A SABR smile at one expiry.
///
/// # Example
///
/// ```rust
/// use curvekit_volatility::sabr::{SabrParameters, SabrSmile};
///
/// let params = SabrParameters::new(0.04, 0.5, -0.3, 0.4).unwrap();
/// let smile = SabrSmile::new(0.03, 2.0, params).unwrap();
///
/// // Negative correlation skews the smile towards low strikes
/// assert!(smile.volatility(0.02).unwrap() > smile.volatility(0.04).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrSmile {
    forward: f64,
    expiry: f64,
    params: SabrParameters,
}

impl SabrSmile {
    /// Creates a smile.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` for invalid parameters, `Input` for a
    /// non-positive forward or expiry.
    pub fn new(forward: f64, expiry: f64, params: SabrParameters) -> VolatilityResult<Self> {
        params.validate()?;
        if !forward.is_finite() || forward <= 0.0 {
            return Err(VolatilityError::input(format!("SABR forward must be positive, got {forward}")));
        }
        if !expiry.is_finite() || expiry <= 0.0 {
            return Err(VolatilityError::input(format!("SABR expiry must be positive, got {expiry}")));
        }
        Ok(Self {
            forward,
            expiry,
            params,
        })
    }

    /// Forward at expiry.
    #[must_use]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Years to expiry.
    #[must_use]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Model parameters.
    #[must_use]
    pub fn params(&self) -> SabrParameters {
        self.params
    }

    /// Black volatility at `strike`.
    ///
    /// # Errors
    ///
    /// `Input` for a non-positive strike, or if the approximation breaks
    /// down and yields a non-positive or non-finite volatility.
    pub fn volatility(&self, strike: f64) -> VolatilityResult<f64> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(VolatilityError::input(format!("SABR strike must be positive, got {strike}")));
        }
        let vol = self.params.hagan_volatility(self.forward, strike, self.expiry);
        if !vol.is_finite() || vol <= 0.0 {
            return Err(VolatilityError::input(format!(
                "SABR volatility {vol} at strike {strike}, forward {}",
                self.forward
            )));
        }
        Ok(vol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parameter_domain() {
        assert!(SabrParameters::new(0.2, 0.5, 0.0, 0.3).is_ok());
        assert!(SabrParameters::new(0.0, 0.5, 0.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 1.5, 0.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 0.5, 1.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 0.5, 0.0, -0.1).is_err());
    }

    #[test]
    fn test_lognormal_limit() {
        // beta = 1 and nu = 0 is Black with volatility alpha
        let params = SabrParameters::new(0.25, 1.0, 0.0, 0.0).unwrap();
        let smile = SabrSmile::new(100.0, 1.0, params).unwrap();
        for strike in [60.0, 100.0, 150.0] {
            assert_relative_eq!(smile.volatility(strike).unwrap(), 0.25, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_atm_closed_form() {
        // At the money z = 0 and the formula reduces to its leading terms
        let (f, t) = (0.05_f64, 2.0);
        let params = SabrParameters::new(0.03, 0.5, -0.2, 0.45).unwrap();
        let f_omb = f.powf(0.5);
        let expected = 0.03 / f_omb
            * (1.0
                + t * (0.25 / 24.0 * 0.03 * 0.03 / f
                    + 0.25 * -0.2 * 0.5 * 0.45 * 0.03 / f_omb
                    + (2.0 - 3.0 * 0.04) / 24.0 * 0.45 * 0.45));

        assert_relative_eq!(params.hagan_volatility(f, f, t), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_continuous_through_atm() {
        let params = SabrParameters::new(0.03, 0.5, -0.2, 0.45).unwrap();
        let atm = params.hagan_volatility(0.05, 0.05, 2.0);
        let near = params.hagan_volatility(0.05, 0.05 * (1.0 + 1e-7), 2.0);
        assert_relative_eq!(atm, near, epsilon = 1e-8);
    }

    #[test]
    fn test_smile_rejects_bad_strike() {
        let smile = SabrSmile::new(0.05, 1.0, SabrParameters::new(0.03, 0.5, 0.0, 0.3).unwrap()).unwrap();
        assert!(smile.volatility(0.0).is_err());
        assert!(SabrSmile::new(-0.01, 1.0, smile.params()).is_err());
    }

    proptest! {
        #[test]
        fn prop_volatility_positive_near_forward(
            alpha in 0.01f64..0.1,
            rho in -0.8f64..0.8,
            nu in 0.0f64..1.0,
            moneyness in 0.7f64..1.4,
        ) {
            let params = SabrParameters::new(alpha, 0.5, rho, nu).unwrap();
            let smile = SabrSmile::new(0.04, 1.0, params).unwrap();
            let vol = smile.volatility(0.04 * moneyness).unwrap();
            prop_assert!(vol > 0.0);
        }
    }
}
