//! Conversions between discount factors, zero rates and forward rates.
//!
//! All functions are pure. Zero-length periods and non-positive discount
//! factors are outside the formulas' domain and return
//! [`CoreError::ArithmeticDomain`]; callers that need a value at `t == 0`
//! decide their own fallback.
//!
//! # Example
//!
//! ```rust
//! use curvekit_core::rates::{discount_factor_to_zero_rate, zero_rate_to_discount_factor};
//! use curvekit_core::types::Compounding;
//!
//! let df = zero_rate_to_discount_factor(0.05, 2.0, Compounding::Continuous).unwrap();
//! let rate = discount_factor_to_zero_rate(df, 2.0, Compounding::Continuous).unwrap();
//! assert!((rate - 0.05).abs() < 1e-12);
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::Compounding;

/// Converts a discount factor to a zero rate.
///
/// - continuous: `-ln(df) / t`
/// - simple: `(1/df - 1) / t`
/// - periodic, `m` per year: `m * (df^(-1/(m t)) - 1)`
///
/// # Errors
///
/// `ArithmeticDomain` if `t == 0`, `df <= 0`, or either input is not finite.
pub fn discount_factor_to_zero_rate(df: f64, t: f64, compounding: Compounding) -> CoreResult<f64> {
    if !df.is_finite() || !t.is_finite() {
        return Err(CoreError::arithmetic_domain(format!(
            "non-finite input (df={df}, t={t})"
        )));
    }
    if df <= 0.0 {
        return Err(CoreError::arithmetic_domain(format!(
            "discount factor must be positive, got {df}"
        )));
    }
    if t == 0.0 {
        return Err(CoreError::arithmetic_domain(
            "zero rate undefined for a zero-length period",
        ));
    }

    let rate = match compounding.periods_per_year() {
        None if compounding.is_continuous() => -df.ln() / t,
        None => (1.0 / df - 1.0) / t,
        Some(m) => {
            let m = f64::from(m);
            m * (df.powf(-1.0 / (m * t)) - 1.0)
        }
    };
    Ok(rate)
}

/// Converts a zero rate to a discount factor. Inverse of
/// [`discount_factor_to_zero_rate`]; `t == 0` gives exactly 1.
///
/// # Errors
///
/// `ArithmeticDomain` if the result would not be a positive finite number
/// (e.g. a simple rate with `1 + r t <= 0`).
pub fn zero_rate_to_discount_factor(rate: f64, t: f64, compounding: Compounding) -> CoreResult<f64> {
    if t == 0.0 {
        return Ok(1.0);
    }

    let df = match compounding.periods_per_year() {
        None if compounding.is_continuous() => (-rate * t).exp(),
        None => 1.0 / (1.0 + rate * t),
        Some(m) => {
            let m = f64::from(m);
            (1.0 + rate / m).powf(-m * t)
        }
    };

    if df.is_finite() && df > 0.0 {
        Ok(df)
    } else {
        Err(CoreError::arithmetic_domain(format!(
            "rate {rate} over {t} years gives invalid discount factor {df}"
        )))
    }
}

/// Simple forward rate between two discount factors over accrual `tau`:
/// `(df_start / df_end - 1) / tau`.
///
/// # Errors
///
/// `ArithmeticDomain` if `tau == 0` or `df_end <= 0`.
pub fn simple_forward_rate(df_start: f64, df_end: f64, tau: f64) -> CoreResult<f64> {
    if tau == 0.0 {
        return Err(CoreError::arithmetic_domain(
            "forward rate undefined for a zero-length period",
        ));
    }
    if df_end <= 0.0 {
        return Err(CoreError::arithmetic_domain(format!(
            "discount factor must be positive, got {df_end}"
        )));
    }
    Ok((df_start / df_end - 1.0) / tau)
}

/// Discount factor implied by a simple rate over `tau`: `1 / (1 + rate * tau)`.
///
/// # Errors
///
/// `ArithmeticDomain` if `1 + rate * tau <= 0`.
pub fn simple_discount_factor(rate: f64, tau: f64) -> CoreResult<f64> {
    let growth = 1.0 + rate * tau;
    if growth <= 0.0 {
        return Err(CoreError::arithmetic_domain(format!(
            "growth factor 1 + {rate} * {tau} is not positive"
        )));
    }
    Ok(1.0 / growth)
}

impl Compounding {
    /// Discount factor for `rate` over `t` years under this compounding.
    ///
    /// # Errors
    ///
    /// See [`zero_rate_to_discount_factor`].
    pub fn discount_factor(&self, rate: f64, t: f64) -> CoreResult<f64> {
        zero_rate_to_discount_factor(rate, t, *self)
    }

    /// Zero rate implied by `df` at `t` years under this compounding.
    ///
    /// # Errors
    ///
    /// See [`discount_factor_to_zero_rate`].
    pub fn zero_rate(&self, df: f64, t: f64) -> CoreResult<f64> {
        discount_factor_to_zero_rate(df, t, *self)
    }
}
