//! Actual/Actual ISDA.

use chrono::Datelike;
use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The period is split at year boundaries; days falling in a leap year are
/// divided by 366 and the rest by 365.
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap years}}{365} + \frac{\text{Days in leap years}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if end < start {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start;

        while current.year() < end.year() {
            // First day of the following year
            let next_year = current.add_days(i64::from(
                current.days_in_year() - current.as_naive_date().ordinal0(),
            ));
            let days = current.days_between(&next_year);
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
            current = next_year;
        }

        let days = current.days_between(&end);
        if days > 0 {
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
