//! Black (1976) option formula on a lognormal forward.
//!
//! Prices are undiscounted; callers multiply by the discount factor and the
//! accrual of the period they are pricing.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

/// Call or put payoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Pays `max(F - K, 0)`; a caplet.
    Call,
    /// Pays `max(K - F, 0)`; a floorlet.
    Put,
}

impl OptionKind {
    /// Intrinsic value at forward `forward`.
    #[must_use]
    pub fn intrinsic(&self, forward: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (forward - strike).max(0.0),
            OptionKind::Put => (strike - forward).max(0.0),
        }
    }
}

/// Standard normal cumulative distribution.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

fn d1_d2(forward: f64, strike: f64, volatility: f64, expiry: f64) -> (f64, f64) {
    let std_dev = volatility * expiry.sqrt();
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    (d1, d1 - std_dev)
}

/// Undiscounted Black price.
///
/// With no remaining variance (`volatility * sqrt(expiry)` vanishing) or a
/// non-positive forward or strike the option is worth its intrinsic value.
///
/// # Example
///
/// ```rust
/// use curvekit_curves::black::{black_price, OptionKind};
///
/// let call = black_price(OptionKind::Call, 0.05, 0.05, 0.2, 1.0);
/// let put = black_price(OptionKind::Put, 0.05, 0.05, 0.2, 1.0);
/// assert!((call - put).abs() < 1e-15);
/// ```
#[must_use]
pub fn black_price(kind: OptionKind, forward: f64, strike: f64, volatility: f64, expiry: f64) -> f64 {
    if forward <= 0.0 || strike <= 0.0 || volatility * expiry.max(0.0).sqrt() < 1e-12 {
        return kind.intrinsic(forward, strike);
    }
    let (d1, d2) = d1_d2(forward, strike, volatility, expiry);
    match kind {
        OptionKind::Call => forward * norm_cdf(d1) - strike * norm_cdf(d2),
        OptionKind::Put => strike * norm_cdf(-d2) - forward * norm_cdf(-d1),
    }
}

/// Sensitivity of the undiscounted Black price to volatility.
#[must_use]
pub fn black_vega(forward: f64, strike: f64, volatility: f64, expiry: f64) -> f64 {
    if forward <= 0.0 || strike <= 0.0 || volatility * expiry.max(0.0).sqrt() < 1e-12 {
        return 0.0;
    }
    let (d1, _) = d1_d2(forward, strike, volatility, expiry);
    forward * norm_pdf(d1) * expiry.sqrt()
}
