//! Quoted options: the inputs of every volatility build.

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_curves::assets::HasMaturity;
use curvekit_curves::black::{black_price, black_vega, OptionKind};
use curvekit_math::solvers::{hybrid, SolveBudget};
use serde::{Deserialize, Serialize};

use crate::error::{VolatilityError, VolatilityResult};

/// Search interval for implied volatilities.
const VOLATILITY_BOUNDS: (f64, f64) = (1e-6, 5.0);

/// How an option is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OptionQuote {
    /// Black lognormal volatility.
    Volatility {
        /// The quoted volatility.
        volatility: f64,
    },
    /// Discounted option premium.
    Premium {
        /// Call or put.
        kind: OptionKind,
        /// Premium per unit notional.
        price: f64,
        /// Discount factor from the payment date.
        discount_factor: f64,
    },
}

/// A European option on a forward, quoted in volatility or premium.
///
/// # Example
///
/// ```rust
/// use curvekit_core::daycounts::DayCountConvention;
/// use curvekit_core::Date;
/// use curvekit_curves::black::{black_price, OptionKind};
/// use curvekit_math::solvers::SolveBudget;
/// use curvekit_volatility::OptionAsset;
///
/// let base = Date::from_ymd(2025, 1, 2).unwrap();
/// let expiry = base.add_days(365);
/// let premium = 0.97 * black_price(OptionKind::Call, 100.0, 105.0, 0.25, 1.0);
///
/// let option = OptionAsset::from_premium("C105", expiry, 105.0, 100.0, OptionKind::Call, premium, 0.97);
/// let vol = option
///     .implied_volatility(base, DayCountConvention::Act365Fixed, &SolveBudget::default())
///     .unwrap();
/// assert!((vol - 0.25).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionAsset {
    id: String,
    expiry: Date,
    strike: f64,
    forward: f64,
    quote: OptionQuote,
}

impl OptionAsset {
    /// Creates an option.
    #[must_use]
    pub fn new(id: impl Into<String>, expiry: Date, strike: f64, forward: f64, quote: OptionQuote) -> Self {
        Self {
            id: id.into(),
            expiry,
            strike,
            forward,
            quote,
        }
    }

    /// Creates an option quoted in Black volatility.
    #[must_use]
    pub fn from_volatility(
        id: impl Into<String>,
        expiry: Date,
        strike: f64,
        forward: f64,
        volatility: f64,
    ) -> Self {
        Self::new(id, expiry, strike, forward, OptionQuote::Volatility { volatility })
    }

    /// Creates an option quoted as a discounted premium.
    #[must_use]
    pub fn from_premium(
        id: impl Into<String>,
        expiry: Date,
        strike: f64,
        forward: f64,
        kind: OptionKind,
        price: f64,
        discount_factor: f64,
    ) -> Self {
        Self::new(
            id,
            expiry,
            strike,
            forward,
            OptionQuote::Premium {
                kind,
                price,
                discount_factor,
            },
        )
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Expiry date.
    #[must_use]
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// Strike.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Forward of the underlying at expiry.
    #[must_use]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// The market quote.
    #[must_use]
    pub fn quote(&self) -> OptionQuote {
        self.quote
    }

    /// Black volatility implied by the quote.
    ///
    /// Volatility quotes are returned as they are; premiums are inverted
    /// through Black's formula with `budget` governing the root search.
    ///
    /// # Errors
    ///
    /// `Input` for a non-positive strike or forward, an expiry on or before
    /// `base_date`, or a premium outside the no-arbitrage bounds;
    /// `Math` if the inversion does not converge.
    pub fn implied_volatility(
        &self,
        base_date: Date,
        day_count: DayCountConvention,
        budget: &SolveBudget,
    ) -> VolatilityResult<f64> {
        if self.strike.is_nan() || self.strike <= 0.0 || self.forward.is_nan() || self.forward <= 0.0 {
            return Err(VolatilityError::input(format!(
                "{} needs a positive strike and forward, got K={} F={}",
                self.id, self.strike, self.forward
            )));
        }

        match self.quote {
            OptionQuote::Volatility { volatility } => {
                if !volatility.is_finite() || volatility <= 0.0 {
                    return Err(VolatilityError::input(format!(
                        "{} quotes a volatility of {volatility}",
                        self.id
                    )));
                }
                Ok(volatility)
            }
            OptionQuote::Premium {
                kind,
                price,
                discount_factor,
            } => {
                let t = day_count.year_fraction_f64(base_date, self.expiry);
                if t <= 0.0 {
                    return Err(VolatilityError::input(format!(
                        "{} expires on {}, not after {base_date}",
                        self.id, self.expiry
                    )));
                }
                if !discount_factor.is_finite() || discount_factor <= 0.0 {
                    return Err(VolatilityError::input(format!(
                        "{} has discount factor {discount_factor}",
                        self.id
                    )));
                }
                self.invert_premium(kind, price / discount_factor, t, budget)
            }
        }
    }

    fn invert_premium(&self, kind: OptionKind, target: f64, t: f64, budget: &SolveBudget) -> VolatilityResult<f64> {
        let (forward, strike) = (self.forward, self.strike);
        let intrinsic = kind.intrinsic(forward, strike);
        let ceiling = match kind {
            OptionKind::Call => forward,
            OptionKind::Put => strike,
        };
        if target.is_nan() || target <= intrinsic || target >= ceiling {
            return Err(VolatilityError::input(format!(
                "{} premium {target} lies outside ({intrinsic}, {ceiling})",
                self.id
            )));
        }

        // Brenner-Subrahmanyam starting point
        let guess = ((2.0 * std::f64::consts::PI / t).sqrt() * target / forward)
            .clamp(VOLATILITY_BOUNDS.0 * 10.0, 1.0);

        let result = hybrid(
            |vol| black_price(kind, forward, strike, vol, t) - target,
            |vol| black_vega(forward, strike, vol, t),
            guess,
            Some(VOLATILITY_BOUNDS),
            budget,
        )?;
        Ok(result.root)
    }
}

impl HasMaturity for OptionAsset {
    fn maturity(&self) -> Date {
        self.expiry
    }
}
