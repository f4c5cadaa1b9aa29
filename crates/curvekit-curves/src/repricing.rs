//! Repricing validation for bootstrapped curves.
//!
//! Every build reprices its input assets on the finished curve. A curve that
//! does not reproduce an input quote within tolerance is wrong, and
//! [`Bootstrapper::bootstrap_validated_strict`](crate::bootstrap::Bootstrapper::bootstrap_validated_strict)
//! turns such a report into an error.

use std::fmt;

use crate::assets::{AssetFamily, PriceableAsset};
use crate::error::CurveResult;
use crate::traits::CurveView;

/// Repricing tolerances, in quote units.
pub mod tolerances {
    /// Near machine precision; the default for every bootstrap.
    pub const STRICT: f64 = 1e-9;

    /// Relaxed tolerance for noisy or hand-entered quotes.
    pub const RELAXED: f64 = 1e-6;
}

/// Result of repricing one asset against the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Asset identifier.
    pub instrument_id: String,
    /// Asset family.
    pub family: AssetFamily,
    /// Market quote.
    pub target: f64,
    /// Quote implied by the curve.
    pub model: f64,
    /// `|model - target|`.
    pub error: f64,
    /// Tolerance applied.
    pub tolerance: f64,
    /// Whether the error is within tolerance.
    pub passed: bool,
}

impl RepricingCheck {
    /// Creates a check from the two quotes.
    #[must_use]
    pub fn new(
        instrument_id: impl Into<String>,
        family: AssetFamily,
        target: f64,
        model: f64,
        tolerance: f64,
    ) -> Self {
        let error = (model - target).abs();
        Self {
            instrument_id: instrument_id.into(),
            family,
            target,
            model,
            error,
            tolerance,
            // NaN errors fail
            passed: error <= tolerance,
        }
    }

    /// Reprices `asset` on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates the asset's pricing error.
    pub fn from_asset(
        asset: &dyn PriceableAsset,
        curve: &dyn CurveView,
        tolerance: f64,
    ) -> CurveResult<Self> {
        Ok(Self::new(
            asset.id(),
            asset.family(),
            asset.market_quote(),
            asset.implied_quote(curve)?,
            tolerance,
        ))
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "OK  " } else { "FAIL" };
        write!(
            f,
            "{status} {} ({}) | quote: {:.8} | model: {:.8} | error: {:.2e} (tol: {:.2e})",
            self.instrument_id, self.family, self.target, self.model, self.error, self.tolerance
        )
    }
}

/// Repricing results for every asset of a build.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    max_error: f64,
    rms_error: f64,
    passed_count: usize,
}

impl RepricingReport {
    /// Summarises individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        let max_error = checks.iter().map(|c| c.error).fold(0.0_f64, f64::max);
        let rms_error = if checks.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = checks.iter().map(|c| c.error * c.error).sum();
            (sum_sq / checks.len() as f64).sqrt()
        };
        let passed_count = checks.iter().filter(|c| c.passed).count();

        Self {
            checks,
            max_error,
            rms_error,
            passed_count,
        }
    }

    /// Returns true if every asset repriced within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.passed_count == self.checks.len()
    }

    /// Individual checks, in maturity order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Largest absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Root mean square error.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Number of passing assets.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed_count
    }

    /// Number of failing assets.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count
    }

    /// Ids of the failing assets.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.instrument_id.as_str())
            .collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing Report")?;
        writeln!(f, "================")?;
        writeln!(f, "Status: {}", if self.is_valid() { "PASSED" } else { "FAILED" })?;
        writeln!(f, "Instruments: {}/{} passed", self.passed_count, self.checks.len())?;
        writeln!(f, "Max Error: {:.2e}", self.max_error)?;
        writeln!(f, "RMS Error: {:.2e}", self.rms_error)?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_report_statistics() {
        let report = RepricingReport::new(vec![
            RepricingCheck::new("DEP-1Y", AssetFamily::Deposit, 0.05, 0.05 + 3e-10, tolerances::STRICT),
            RepricingCheck::new("SWP-5Y", AssetFamily::Swap, 0.04, 0.0401, tolerances::STRICT),
        ]);
        assert!(!report.is_valid());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed_instruments(), vec!["SWP-5Y"]);
        assert_relative_eq!(report.max_error(), 1e-4, epsilon = 1e-12);
        assert!(report.to_string().contains("FAILED"));
    }

    #[test]
    fn test_nan_model_quote_fails() {
        let check = RepricingCheck::new("X", AssetFamily::Fra, 0.03, f64::NAN, 1.0);
        assert!(!check.passed);
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = RepricingReport::new(Vec::new());
        assert!(report.is_valid());
        assert_eq!(report.rms_error(), 0.0);
    }
}
