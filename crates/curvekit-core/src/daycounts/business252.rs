//! Business/252 (Brazilian money-market basis).

use std::sync::Arc;

use rust_decimal::Decimal;

use super::DayCount;
use crate::calendars::{Calendar, WeekendCalendar};
use crate::types::Date;

/// Business/252: business days in `[start, end)` divided by 252.
///
/// Business days come from the attached calendar; without one only weekends
/// are excluded.
#[derive(Clone)]
pub struct Business252 {
    calendar: Arc<dyn Calendar>,
}

impl Business252 {
    /// Creates the convention over the given calendar.
    #[must_use]
    pub fn new(calendar: Arc<dyn Calendar>) -> Self {
        Self { calendar }
    }

    /// Returns the calendar used to count business days.
    #[must_use]
    pub fn calendar(&self) -> &dyn Calendar {
        self.calendar.as_ref()
    }
}

impl Default for Business252 {
    fn default() -> Self {
        Self::new(Arc::new(WeekendCalendar))
    }
}

impl std::fmt::Debug for Business252 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Business252")
            .field("calendar", &self.calendar.name())
            .finish()
    }
}

impl DayCount for Business252 {
    fn name(&self) -> &'static str {
        "BUS/252"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(252)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        self.calendar.business_days_between(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::HolidayCalendar;
    use rust_decimal_macros::dec;

    #[test]
    fn test_one_week() {
        let dc = Business252::default();
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        let next_monday = Date::from_ymd(2025, 1, 13).unwrap();
        assert_eq!(dc.day_count(monday, next_monday), 5);
        assert_eq!(dc.year_fraction(monday, next_monday), dec!(5) / dec!(252));
    }

    #[test]
    fn test_holidays_excluded() {
        let holiday = Date::from_ymd(2025, 1, 8).unwrap();
        let dc = Business252::new(Arc::new(HolidayCalendar::new("BR", [holiday])));
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        let next_monday = Date::from_ymd(2025, 1, 13).unwrap();
        assert_eq!(dc.day_count(monday, next_monday), 4);
        assert_eq!(dc.year_fraction(next_monday, monday), dec!(-4) / dec!(252));
    }
}
