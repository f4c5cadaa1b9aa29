//! FX forwards on an FX forward curve.

use curvekit_core::Date;
use serde::{Deserialize, Serialize};

use super::{
    AssetFamily, ComputesImpliedQuote, HasMarketQuote, HasMaturity, PriceableAsset, SolveStrategy,
};
use crate::error::{CurveError, CurveResult};
use crate::traits::CurveView;

/// An outright FX forward rate for delivery on `maturity`.
///
/// The outright is the curve value at delivery, so no solving is involved.
/// Forwards quoted in points are converted with the pair's pip size:
///
/// ```text
/// outright = spot + points * pip_size
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxForward {
    id: String,
    maturity: Date,
    outright: f64,
}

impl FxForward {
    /// Creates a forward quoted as an outright rate.
    #[must_use]
    pub fn new(id: impl Into<String>, maturity: Date, outright: f64) -> Self {
        Self {
            id: id.into(),
            maturity,
            outright,
        }
    }

    /// Creates a forward quoted in points over `spot`.
    ///
    /// # Errors
    ///
    /// `Input` for a non-positive pip size or outright.
    pub fn from_points(
        id: impl Into<String>,
        maturity: Date,
        spot: f64,
        points: f64,
        pip_size: f64,
    ) -> CurveResult<Self> {
        let id = id.into();
        if pip_size.is_nan() || pip_size <= 0.0 {
            return Err(CurveError::input(format!("{id}: pip size must be positive, got {pip_size}")));
        }
        let outright = spot + points * pip_size;
        if outright.is_nan() || outright <= 0.0 {
            return Err(CurveError::input(format!(
                "{id}: {points} points over {spot} give a non-positive outright {outright}"
            )));
        }
        Ok(Self::new(id, maturity, outright))
    }

    /// Quoted outright rate.
    #[must_use]
    pub fn outright(&self) -> f64 {
        self.outright
    }
}

impl HasMaturity for FxForward {
    fn maturity(&self) -> Date {
        self.maturity
    }
}

impl HasMarketQuote for FxForward {
    fn market_quote(&self) -> f64 {
        self.outright
    }
}

impl ComputesImpliedQuote for FxForward {
    fn implied_quote(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        curve.value(self.maturity)
    }

    fn solve_strategy(&self) -> SolveStrategy {
        SolveStrategy::DirectQuote
    }
}

impl PriceableAsset for FxForward {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> AssetFamily {
        AssetFamily::FxForward
    }
}
