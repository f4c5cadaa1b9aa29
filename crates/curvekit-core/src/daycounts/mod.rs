//! Day count conventions.
//!
//! A day count maps a pair of dates to a year fraction. Curves use it to turn
//! knot dates into abscissas and assets use it for accrual periods.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`ActActIsda`]: Actual/Actual ISDA
//! - [`Thirty360US`]: 30/360 US (Bond Basis)
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//! - [`Business252`]: Business/252
//!
//! Every convention returns a signed value: `year_fraction(b, a)` is
//! `-year_fraction(a, b)`.
//!
//! # Usage
//!
//! ```rust
//! use curvekit_core::daycounts::{year_fraction, DayCountConvention};
//! use curvekit_core::types::Date;
//! use rust_decimal_macros::dec;
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//! assert_eq!(year_fraction(start, end, DayCountConvention::Act360), dec!(0.25));
//! ```

mod actact;
mod actual;
mod business252;
mod thirty360;

pub use actact::ActActIsda;
pub use actual::{Act360, Act365Fixed};
pub use business252::Business252;
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`) since curves holding
/// them are shared across threads.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64`, for use in floating-point formulas.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }
}

/// Closed set of supported day count conventions.
///
/// Selectable at runtime (and from configuration files) and convertible to a
/// boxed [`DayCount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,

    /// Actual/365 Fixed
    #[default]
    Act365Fixed,

    /// Actual/Actual ISDA
    ActActIsda,

    /// 30/360 US (Bond Basis)
    Thirty360US,

    /// 30E/360 (Eurobond Basis)
    Thirty360E,

    /// Business/252 over a weekends-only calendar.
    ///
    /// Use [`Business252::new`] directly for a holiday calendar.
    Business252,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
            DayCountConvention::Business252 => Box::new(Business252::default()),
        }
    }

    /// Returns the conventional name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
            DayCountConvention::Business252 => "BUS/252",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
            DayCountConvention::Business252,
        ]
    }

    /// Year fraction under this convention.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        year_fraction(start, end, *self)
    }

    /// Year fraction under this convention as `f64`.
    #[must_use]
    pub fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }
}

/// Year fraction between two dates under `convention`.
///
/// Pure and deterministic. Returns a signed value when `end < start`.
#[must_use]
pub fn year_fraction(start: Date, end: Date, convention: DayCountConvention) -> Decimal {
    match convention {
        DayCountConvention::Act360 => Act360.year_fraction(start, end),
        DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
        DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
        DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
        DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
        DayCountConvention::Business252 => Business252::default().year_fraction(start, end),
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = DayCountParseError;

    /// Parses conventional names ("ACT/360", "30E/360") and enum-style names
    /// ("Act360", "Thirty360US"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365FIXED" | "ACT365" => {
                Ok(DayCountConvention::Act365Fixed)
            }

            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" | "ACTACT" => {
                Ok(DayCountConvention::ActActIsda)
            }

            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360US" => {
                Ok(DayCountConvention::Thirty360US)
            }

            "30E/360" | "30/360 ICMA" | "EUROBOND" | "THIRTY360E" => {
                Ok(DayCountConvention::Thirty360E)
            }

            "BUS/252" | "BUSINESS/252" | "BUS252" | "BUSINESS252" => {
                Ok(DayCountConvention::Business252)
            }

            _ => Err(DayCountParseError(s.to_string())),
        }
    }
}

/// Error type for parsing day count conventions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day count convention: '{0}'")]
pub struct DayCountParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convention_enum_half_year() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 7, 1).unwrap();
        for convention in DayCountConvention::all() {
            let dc = convention.to_day_count();
            assert_eq!(dc.name(), convention.name());
            let yf = dc.year_fraction(start, end);
            assert!(yf > dec!(0.4) && yf < dec!(0.6), "{convention}: {yf}");
            assert_eq!(yf, year_fraction(start, end, *convention));
        }
    }

    #[test]
    fn test_from_str_roundtrip() {
        for convention in DayCountConvention::all() {
            let parsed: DayCountConvention = convention.name().parse().unwrap();
            assert_eq!(*convention, parsed);
        }
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
    }

    #[test]
    fn test_from_str_invalid() {
        let err = "INVALID".parse::<DayCountConvention>().unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_serde_enum_name() {
        let json = serde_json::to_string(&DayCountConvention::Thirty360E).unwrap();
        assert_eq!(json, "\"Thirty360E\"");
    }

    proptest! {
        #[test]
        fn prop_year_fraction_is_antisymmetric(a in 0i64..20_000, b in 0i64..20_000) {
            let origin = Date::from_ymd(2000, 1, 1).unwrap();
            let (d1, d2) = (origin.add_days(a), origin.add_days(b));
            for convention in DayCountConvention::all() {
                prop_assert_eq!(
                    year_fraction(d1, d2, *convention),
                    -year_fraction(d2, d1, *convention)
                );
            }
        }
    }
}
