//! SABR-calibrated volatility surfaces.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};

use crate::error::{VolatilityError, VolatilityResult};
use crate::sabr::{SabrCalibrationReport, SabrSmile};

/// A volatility surface made of one SABR smile per calibrated expiry.
///
/// A query evaluates every smile at the requested strike and interpolates
/// the resulting volatilities along expiry. Expiries whose calibration
/// failed are absent from the smiles but kept in [`Self::reports`].
#[derive(Debug, Clone)]
pub struct VolatilitySurface {
    base_date: Date,
    day_count: DayCountConvention,
    expiry_method: InterpolationMethod,
    extrapolation: Extrapolation,
    smiles: Vec<(Date, SabrSmile)>,
    reports: Vec<SabrCalibrationReport>,
}

impl VolatilitySurface {
    pub(crate) fn new(
        base_date: Date,
        day_count: DayCountConvention,
        expiry_method: InterpolationMethod,
        extrapolation: Extrapolation,
        smiles: Vec<(Date, SabrSmile)>,
        reports: Vec<SabrCalibrationReport>,
    ) -> Self {
        Self {
            base_date,
            day_count,
            expiry_method,
            extrapolation,
            smiles,
            reports,
        }
    }

    /// Valuation date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Day count mapping expiries to years.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Calibrated smiles in expiry order.
    #[must_use]
    pub fn smiles(&self) -> &[(Date, SabrSmile)] {
        &self.smiles
    }

    /// The smile calibrated at `expiry`, if any.
    #[must_use]
    pub fn smile(&self, expiry: Date) -> Option<&SabrSmile> {
        self.smiles
            .iter()
            .find(|(date, _)| *date == expiry)
            .map(|(_, smile)| smile)
    }

    /// Expiries that calibrated.
    #[must_use]
    pub fn calibrated_expiries(&self) -> Vec<Date> {
        self.smiles.iter().map(|(date, _)| *date).collect()
    }

    /// One report per grid slice, failed ones included.
    #[must_use]
    pub fn reports(&self) -> &[SabrCalibrationReport] {
        &self.reports
    }

    /// Volatility at (`expiry`, `strike`).
    ///
    /// # Errors
    ///
    /// See [`Self::value_at`].
    pub fn value(&self, expiry: Date, strike: f64) -> VolatilityResult<f64> {
        self.value_at(self.day_count.year_fraction_f64(self.base_date, expiry), strike)
    }

    /// Volatility at expiry time `t` and `strike`.
    ///
    /// # Errors
    ///
    /// `Input` for a non-positive strike or a smile that breaks down at it,
    /// `Math` if `t` lies outside the calibrated expiries and extrapolation
    /// is disabled.
    pub fn value_at(&self, t: f64, strike: f64) -> VolatilityResult<f64> {
        let mut times = Vec::with_capacity(self.smiles.len());
        let mut vols = Vec::with_capacity(self.smiles.len());
        for (_, smile) in &self.smiles {
            times.push(smile.expiry());
            vols.push(smile.volatility(strike)?);
        }

        match vols.as_slice() {
            [] => Err(VolatilityError::NoCalibratedSlices {
                attempted: self.reports.len(),
            }),
            [only] => Ok(*only),
            _ => {
                let interpolator = self.expiry_method.build(times, vols, self.extrapolation)?;
                Ok(interpolator.interpolate(t)?)
            }
        }
    }
}
