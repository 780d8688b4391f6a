use chrono::{Datelike, NaiveDate, Weekday};

use crate::consts::{DAYS_PER_WEEK, DEFAULT_FIRST_DAY_NO, MAX_FIRST_DAY_NO, WEEKDAY_KEYS};

/// Canonical week, Sunday first
const CANONICAL_WEEK: [Weekday; DAYS_PER_WEEK] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// The seven weekdays in display order, starting from the configured first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOrder([Weekday; DAYS_PER_WEEK]);

impl DayOrder {
    /// Rotates the canonical week left by `first_day_no` (0 = Sunday).
    ///
    /// Values outside `0..=6` are clamped to the nearest end.
    pub fn new(first_day_no: i64) -> Self {
        let clamped = first_day_no.clamp(0, MAX_FIRST_DAY_NO);
        if clamped != first_day_no {
            log::warn!("first_day_no {first_day_no} out of range, using {clamped}");
        }

        let mut days = CANONICAL_WEEK;
        days.rotate_left(usize::try_from(clamped).unwrap_or_default());
        Self(days)
    }

    /// Returns the weekdays in display order
    pub const fn days(&self) -> &[Weekday; DAYS_PER_WEEK] {
        &self.0
    }

    /// Returns the first weekday of a displayed week
    pub const fn first(&self) -> Weekday {
        self.0[0]
    }

    /// Returns the label keys (`"mon"`, `"tue"`, ...) in display order
    pub fn keys(&self) -> [&'static str; DAYS_PER_WEEK] {
        self.0.map(weekday_key)
    }

    /// Column of `date` in a displayed week, in `0..=6`.
    pub fn weekday_index(&self, date: NaiveDate) -> usize {
        let canonical = date.weekday().num_days_from_sunday() as usize;
        let first = self.first().num_days_from_sunday() as usize;
        (canonical + DAYS_PER_WEEK - first) % DAYS_PER_WEEK
    }
}

impl Default for DayOrder {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_DAY_NO)
    }
}

/// Label key for a weekday
pub fn weekday_key(day: Weekday) -> &'static str {
    WEEKDAY_KEYS[day.num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_monday_first() {
        let order = DayOrder::new(1);
        assert_eq!(order.keys(), ["mon", "tue", "wed", "thu", "fri", "sat", "sun"]);
        assert_eq!(order, DayOrder::default());
    }

    #[test]
    fn test_sunday_first_is_canonical() {
        let order = DayOrder::new(0);
        assert_eq!(order.days(), &CANONICAL_WEEK);
        assert_eq!(order.first(), Weekday::Sun);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(DayOrder::new(9).first(), Weekday::Sat);
        assert_eq!(DayOrder::new(6).first(), Weekday::Sat);
        assert_eq!(DayOrder::new(-3).first(), Weekday::Sun);
    }

    #[test]
    fn test_weekday_index() {
        // 2021-06-09 is a Wednesday
        let wednesday = date(2021, 6, 9);
        assert_eq!(DayOrder::new(1).weekday_index(wednesday), 2);
        assert_eq!(DayOrder::new(0).weekday_index(wednesday), 3);
        assert_eq!(DayOrder::new(3).weekday_index(wednesday), 0);
        assert_eq!(DayOrder::new(4).weekday_index(wednesday), 6);
    }

    #[test]
    fn test_index_matches_position_in_order() {
        for first in 0..=6 {
            let order = DayOrder::new(first);
            for offset in 0..7 {
                let day = date(2024, 1, 1 + offset);
                let index = order.weekday_index(day);
                assert_eq!(order.days()[index], day.weekday(), "first={first} day={day}");
            }
        }
    }
}
