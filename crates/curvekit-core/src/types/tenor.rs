//! Tenors (`1D`, `2W`, `3M`, `10Y`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Calendar days
    Days,
    /// Weeks of seven calendar days
    Weeks,
    /// Calendar months (end-of-month clamped)
    Months,
    /// Calendar years
    Years,
}

impl TenorUnit {
    fn suffix(self) -> char {
        match self {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        }
    }
}

/// A period of time expressed as a count of units.
///
/// Serialized as its string form, e.g. `"3M"`.
///
/// # Example
///
/// ```rust
/// use curvekit_core::types::{Date, Tenor};
///
/// let tenor: Tenor = "6M".parse().unwrap();
/// let start = Date::from_ymd(2025, 1, 31).unwrap();
/// assert_eq!(tenor.advance(start).unwrap(), Date::from_ymd(2025, 7, 31).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tenor {
    amount: i32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from an amount and unit.
    #[must_use]
    pub const fn new(amount: i32, unit: TenorUnit) -> Self {
        Self { amount, unit }
    }

    /// Creates a tenor of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TenorUnit::Days)
    }

    /// Creates a tenor of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TenorUnit::Weeks)
    }

    /// Creates a tenor of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TenorUnit::Months)
    }

    /// Creates a tenor of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TenorUnit::Years)
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> i32 {
        self.amount
    }

    /// Returns the unit.
    #[must_use]
    pub const fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Returns the date reached by moving `self` forward from `date`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn advance(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            TenorUnit::Days => Ok(date.add_days(i64::from(self.amount))),
            TenorUnit::Weeks => Ok(date.add_days(7 * i64::from(self.amount))),
            TenorUnit::Months => date.add_months(self.amount),
            TenorUnit::Years => date.add_years(self.amount),
        }
    }

    /// Approximate length in years (365-day years, 12-month years).
    ///
    /// Used only for ordering and initial guesses, never for accrual.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.amount);
        match self.unit {
            TenorUnit::Days => n / 365.0,
            TenorUnit::Weeks => n * 7.0 / 365.0,
            TenorUnit::Months => n / 12.0,
            TenorUnit::Years => n,
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_uppercase();
        let Some(last) = trimmed.chars().last() else {
            return Err(CoreError::invalid_tenor("empty tenor"));
        };

        let unit = match last {
            'D' => TenorUnit::Days,
            'W' => TenorUnit::Weeks,
            'M' => TenorUnit::Months,
            'Y' => TenorUnit::Years,
            other => {
                return Err(CoreError::invalid_tenor(format!(
                    "unknown unit '{other}' in '{s}'"
                )))
            }
        };

        let amount = trimmed[..trimmed.len() - 1]
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_tenor(format!("cannot parse amount in '{s}'")))?;

        Ok(Tenor::new(amount, unit))
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let tenor: Tenor = "3m".parse().unwrap();
        assert_eq!(tenor, Tenor::months(3));
        assert_eq!(tenor.to_string(), "3M");
        assert_eq!("10Y".parse::<Tenor>().unwrap(), Tenor::years(10));
        assert_eq!("2W".parse::<Tenor>().unwrap(), Tenor::weeks(2));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Tenor>().is_err());
        assert!("3X".parse::<Tenor>().is_err());
        assert!("M".parse::<Tenor>().is_err());
    }

    #[test]
    fn test_advance() {
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(
            Tenor::months(1).advance(start).unwrap(),
            Date::from_ymd(2025, 2, 28).unwrap()
        );
        assert_eq!(
            Tenor::weeks(1).advance(start).unwrap(),
            Date::from_ymd(2025, 2, 7).unwrap()
        );
        assert_eq!(
            Tenor::years(2).advance(start).unwrap(),
            Date::from_ymd(2027, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Tenor::months(6)).unwrap();
        assert_eq!(json, "\"6M\"");
        let back: Tenor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tenor::months(6));
    }
}
