//! What the values stored on a curve represent.

use std::fmt;

use curvekit_core::types::{Compounding, Tenor};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Kind of value held at each knot of a term curve.
///
/// Conversions check this tag before reinterpreting a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CurveValueType {
    /// Discount factors, `1.0` at the base date.
    DiscountFactor,
    /// Zero rates under the given compounding.
    ZeroRate {
        /// Compounding of the stored rates.
        compounding: Compounding,
    },
    /// Simple forward rates over a fixed tenor starting at each knot.
    ForwardRate {
        /// Length of each forward period.
        tenor: Tenor,
    },
    /// Lognormal volatilities.
    Volatility,
    /// Prices, e.g. of exchange-traded futures.
    Price,
    /// Outright FX forward rates, spot at the base date.
    FxForward,
}

impl CurveValueType {
    /// Zero rates with continuous compounding.
    #[must_use]
    pub const fn continuous_zero() -> Self {
        Self::ZeroRate {
            compounding: Compounding::Continuous,
        }
    }

    /// Returns true if a discount factor can be derived from values of this kind.
    #[must_use]
    pub fn implies_discounting(&self) -> bool {
        matches!(self, Self::DiscountFactor | Self::ZeroRate { .. })
    }

    /// Discount factor implied by a curve value at time `t`.
    ///
    /// The base date (`t == 0`) always discounts at `1.0`.
    ///
    /// # Errors
    ///
    /// `IncompatibleValueType` for curves that do not imply discounting, or a
    /// domain error from the compounding formula.
    pub fn to_discount_factor(&self, value: f64, t: f64) -> CurveResult<f64> {
        match self {
            Self::DiscountFactor => Ok(if t == 0.0 { 1.0 } else { value }),
            Self::ZeroRate { compounding } => Ok(compounding.discount_factor(value, t)?),
            other => Err(CurveError::incompatible_value_type(
                "DiscountFactor or ZeroRate",
                other.to_string(),
            )),
        }
    }

    /// Curve value that represents discount factor `df` at time `t`.
    ///
    /// # Errors
    ///
    /// `IncompatibleValueType` for curves that do not imply discounting;
    /// `ArithmeticDomain` for a zero rate at `t == 0` or a non-positive `df`.
    pub fn from_discount_factor(&self, df: f64, t: f64) -> CurveResult<f64> {
        match self {
            Self::DiscountFactor => Ok(df),
            Self::ZeroRate { compounding } => Ok(compounding.zero_rate(df, t)?),
            other => Err(CurveError::incompatible_value_type(
                "DiscountFactor or ZeroRate",
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for CurveValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscountFactor => write!(f, "DiscountFactor"),
            Self::ZeroRate { compounding } => write!(f, "ZeroRate({compounding})"),
            Self::ForwardRate { tenor } => write!(f, "ForwardRate({tenor})"),
            Self::Volatility => write!(f, "Volatility"),
            Self::Price => write!(f, "Price"),
            Self::FxForward => write!(f, "FxForward"),
        }
    }
}
