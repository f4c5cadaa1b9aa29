//! Business day calendars.
//!
//! This module provides:
//! - The [`Calendar`] trait
//! - [`WeekendCalendar`], which treats only Saturdays and Sundays as holidays
//! - [`HolidayCalendar`], weekends plus an explicit holiday list

use std::collections::BTreeSet;

use crate::types::Date;

/// Trait for business day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Counts business days in the half-open interval `[start, end)`.
    ///
    /// Returns a negative count when `end < start`.
    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        if end < start {
            return -self.business_days_between(end, start);
        }

        let mut count = 0;
        let mut current = start;
        while current < end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }
        count
    }
}

/// A simple weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        date.is_weekday()
    }
}

/// Weekends plus an explicit set of holiday dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar with the given holidays.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Adds a holiday. Returns false if it was already present.
    pub fn add_holiday(&mut self, date: Date) -> bool {
        self.holidays.insert(date)
    }

    /// Number of explicit holidays.
    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        date.is_weekday() && !self.holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        assert!(cal.is_business_day(Date::from_ymd(2025, 1, 6).unwrap()));
        assert!(!cal.is_business_day(Date::from_ymd(2025, 1, 4).unwrap()));
        assert!(!cal.is_business_day(Date::from_ymd(2025, 1, 5).unwrap()));
    }

    #[test]
    fn test_business_days_between_half_open() {
        let cal = WeekendCalendar;
        // Mon..Fri counts Mon, Tue, Wed, Thu
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        let friday = Date::from_ymd(2025, 1, 10).unwrap();
        assert_eq!(cal.business_days_between(monday, friday), 4);
        assert_eq!(cal.business_days_between(friday, monday), -4);
        assert_eq!(cal.business_days_between(monday, monday), 0);
    }

    #[test]
    fn test_holiday_calendar() {
        let new_year = Date::from_ymd(2025, 1, 1).unwrap();
        let cal = HolidayCalendar::new("TEST", [new_year]);
        assert_eq!(cal.name(), "TEST");
        assert!(cal.is_holiday(new_year));

        let start = Date::from_ymd(2024, 12, 30).unwrap();
        let end = Date::from_ymd(2025, 1, 3).unwrap();
        // Mon 30, Tue 31, (Wed 1 holiday), Thu 2
        assert_eq!(cal.business_days_between(start, end), 3);
    }
}
