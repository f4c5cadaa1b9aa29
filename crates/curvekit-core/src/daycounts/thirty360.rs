//! 30/360 day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

#[inline]
fn thirty_360_days(start: Date, end: Date, d1: i64, d2: i64) -> i64 {
    let y1 = i64::from(start.year());
    let y2 = i64::from(end.year());
    let m1 = i64::from(start.month());
    let m2 = i64::from(end.month());
    360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
}

/// 30/360 US (Bond Basis).
///
/// Rules, applied in order:
///
/// 1. If D1 is the last day of February, or 31, D1 becomes 30
/// 2. If D2 is the last day of February and D1 was too, D2 becomes 30
/// 3. If D2 is 31 and D1 is now 30, D2 becomes 30
///
/// The year fraction is signed: a reversed period returns the negated
/// fraction of the forward period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        if end < start {
            return -self.day_count(end, start);
        }

        let start_feb_eom = is_last_day_of_february(start);
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        if start_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if start_feb_eom && is_last_day_of_february(end) {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        thirty_360_days(start, end, d1, d2)
    }
}

/// 30E/360 (Eurobond Basis): any 31st becomes the 30th, no February rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        if end < start {
            return -self.day_count(end, start);
        }

        let d1 = i64::from(start.day()).min(30);
        let d2 = i64::from(end.day()).min(30);
        thirty_360_days(start, end, d1, d2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_us_full_year() {
        assert_eq!(Thirty360US.year_fraction(d(2025, 1, 1), d(2026, 1, 1)), dec!(1));
    }

    #[test]
    fn test_us_feb_eom_start() {
        // D1 = 30 (Feb EOM) so D2 = 31 also becomes 30
        assert_eq!(Thirty360US.day_count(d(2025, 2, 28), d(2025, 3, 31)), 30);
    }

    #[test]
    fn test_us_feb_to_feb() {
        assert_eq!(Thirty360US.day_count(d(2024, 2, 29), d(2025, 2, 28)), 360);
    }

    #[test]
    fn test_us_d2_31_stays_when_d1_below_30() {
        assert_eq!(Thirty360US.day_count(d(2025, 1, 15), d(2025, 3, 31)), 76);
    }

    #[test]
    fn test_e_caps_both_days() {
        assert_eq!(Thirty360E.day_count(d(2025, 1, 31), d(2025, 3, 31)), 60);
        assert_eq!(Thirty360E.day_count(d(2025, 1, 15), d(2025, 3, 31)), 75);
    }

    #[test]
    fn test_e_no_february_rule() {
        assert_eq!(Thirty360E.day_count(d(2025, 2, 28), d(2025, 3, 31)), 32);
    }

    #[test]
    fn test_reversed_is_negative() {
        let (a, b) = (d(2025, 2, 28), d(2025, 8, 31));
        assert_eq!(Thirty360US.year_fraction(b, a), -Thirty360US.year_fraction(a, b));
        assert_eq!(Thirty360E.year_fraction(b, a), -Thirty360E.year_fraction(a, b));
    }
}
