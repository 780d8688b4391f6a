use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::Instant;
use crate::config::{PickerConfig, StoredValues};
use crate::consts::{DEFAULT_LAST_DATE_SPAN_DAYS, DEFAULT_START_OFFSET_DAYS};
use crate::prelude::*;
use crate::resolve::{resolve_date, round_to_half_hour, saturating_add};

/// The inclusive window of selectable instants shared by both endpoints.
/// `first_date` is always less than or equal to `last_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{first_date}/{last_date}")]
#[serde(try_from = "RawBound")]
pub struct Bound {
    first_date: Instant,
    last_date:  Instant,
}

#[derive(Deserialize)]
struct RawBound {
    first_date: Instant,
    last_date:  Instant,
}

impl TryFrom<RawBound> for Bound {
    type Error = RangeError;

    fn try_from(raw: RawBound) -> Result<Self, Self::Error> {
        Self::new(raw.first_date, raw.last_date)
    }
}

/// Error type for bound construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// First date is after last date.
    #[error("Invalid bound: first date ({first}) is after last date ({last})")]
    Inverted { first: Instant, last: Instant },
}

impl Bound {
    /// Creates a new bound with validation.
    ///
    /// # Errors
    /// Returns `RangeError::Inverted` if `first_date > last_date`.
    pub fn new(first_date: Instant, last_date: Instant) -> Result<Self, RangeError> {
        if first_date > last_date {
            return Err(RangeError::Inverted {
                first: first_date,
                last:  last_date,
            });
        }
        Ok(Self {
            first_date,
            last_date,
        })
    }

    /// Returns the first selectable instant
    pub const fn first_date(&self) -> Instant {
        self.first_date
    }

    /// Returns the last selectable instant
    pub const fn last_date(&self) -> Instant {
        self.last_date
    }

    /// Checks if an instant lies inside the window, time of day included
    pub fn contains(&self, instant: Instant) -> bool {
        self.first_date <= instant && instant <= self.last_date
    }

    /// Checks if a whole day lies inside the window, ignoring time of day on both sides
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.first_date.date() <= day && day <= self.last_date.date()
    }

    /// Moves `last_date` forward so that `instant` is inside the window
    pub(crate) fn extend_to(&mut self, instant: Instant) {
        if instant > self.last_date {
            log::warn!("extending last_date from {} to {instant}", self.last_date);
            self.last_date = instant;
        }
    }
}

/// Start date and window as derived at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialDates {
    pub start: Instant,
    pub bound: Bound,
}

/// Resolves the start date and the selectable window from defaults, configuration
/// and stored values.
///
/// A start before `first_date` drags `first_date` down to it. A `last_date` before
/// the start is not clamped but reset to its default span from the start. All three
/// instants are rounded up to the half hour afterwards.
pub fn resolve_initial_dates(now: Instant, config: &PickerConfig, stored: &StoredValues) -> InitialDates {
    let start_default = saturating_add(now, TimeDelta::days(DEFAULT_START_OFFSET_DAYS));
    let start = resolve_date(start_default, config.start_date.as_ref(), stored.start_date.as_deref());

    let mut first = resolve_date(now, config.first_date.as_ref(), stored.first_date.as_deref());
    if start < first {
        log::warn!("start date {start} precedes first date {first}, moving first date to start");
        first = start;
    }

    let last_default = saturating_add(start, TimeDelta::days(DEFAULT_LAST_DATE_SPAN_DAYS));
    let mut last = resolve_date(last_default, config.last_date.as_ref(), stored.last_date.as_deref());
    if last < start {
        log::warn!("last date {last} precedes start date {start}, resetting to {last_default}");
        last = last_default;
    }

    // Rounding is monotonic, so first <= start <= last still holds afterwards.
    let bound = Bound {
        first_date: round_to_half_hour(first),
        last_date:  round_to_half_hour(last),
    };

    InitialDates {
        start: round_to_half_hour(start),
        bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Timelike};

    use crate::test_utils::{at, date};

    fn config_with(start: Option<&str>, first: Option<&str>, last: Option<&str>) -> PickerConfig {
        PickerConfig {
            start_date: start.map(Into::into),
            first_date: first.map(Into::into),
            last_date: last.map(Into::into),
            ..PickerConfig::default()
        }
    }

    #[test]
    fn test_new_bound_cases() {
        assert!(Bound::new(at(2021, 1, 1, 0, 0), at(2021, 1, 2, 0, 0)).is_ok());
        assert!(Bound::new(at(2021, 1, 1, 0, 0), at(2021, 1, 1, 0, 0)).is_ok());
        let err = Bound::new(at(2021, 1, 2, 0, 0), at(2021, 1, 1, 0, 0)).expect_err("inverted bound");
        assert!(err.to_string().contains("is after last date"));
    }

    #[test]
    fn test_contains_uses_time_of_day() {
        let bound = Bound::new(at(2021, 6, 10, 12, 0), at(2021, 6, 20, 8, 0)).expect("valid bound");
        assert!(bound.contains(at(2021, 6, 10, 12, 0)));
        assert!(!bound.contains(at(2021, 6, 10, 11, 30)));
        assert!(bound.contains(at(2021, 6, 20, 8, 0)));
        assert!(!bound.contains(at(2021, 6, 20, 8, 30)));
    }

    #[test]
    fn test_contains_day_ignores_time_of_day() {
        let bound = Bound::new(at(2021, 6, 10, 23, 30), at(2021, 6, 20, 0, 30)).expect("valid bound");
        assert!(bound.contains_day(date(2021, 6, 10)));
        assert!(bound.contains_day(date(2021, 6, 20)));
        assert!(!bound.contains_day(date(2021, 6, 9)));
        assert!(!bound.contains_day(date(2021, 6, 21)));
    }

    #[test]
    fn test_display_and_serde() {
        let bound = Bound::new(at(2021, 6, 10, 0, 0), at(2021, 6, 20, 0, 0)).expect("valid bound");
        assert_eq!(bound.to_string(), "2021-06-10 00:00:00/2021-06-20 00:00:00");

        let json = serde_json::to_string(&bound).expect("serialize bound");
        let parsed: Bound = serde_json::from_str(&json).expect("deserialize bound");
        assert_eq!(parsed, bound);

        let inverted = r#"{"first_date":"2021-06-20T00:00:00","last_date":"2021-06-10T00:00:00"}"#;
        assert!(serde_json::from_str::<Bound>(inverted).is_err());
    }

    #[test]
    fn test_defaults() {
        let now = at(2021, 6, 10, 14, 10);
        let dates = resolve_initial_dates(now, &PickerConfig::default(), &StoredValues::default());

        assert_eq!(dates.start, at(2021, 6, 11, 14, 30));
        assert_eq!(dates.bound.first_date(), at(2021, 6, 10, 14, 30));
        assert_eq!(dates.bound.last_date(), at(2022, 6, 11, 14, 30));
    }

    #[test]
    fn test_first_date_clamped_to_start() {
        let now = at(2021, 5, 1, 9, 0);
        let config = config_with(Some("2021-06-10"), Some("2021-07-01"), None);
        let dates = resolve_initial_dates(now, &config, &StoredValues::default());

        assert_eq!(dates.start, at(2021, 6, 10, 0, 0));
        assert_eq!(dates.bound.first_date(), at(2021, 6, 10, 0, 0));
    }

    #[test]
    fn test_last_date_reset_not_clamped() {
        let now = at(2021, 5, 1, 9, 0);
        let config = config_with(Some("2021-06-10"), None, Some("2021-06-01"));
        let dates = resolve_initial_dates(now, &config, &StoredValues::default());

        assert_eq!(dates.bound.last_date(), at(2021, 6, 10, 0, 0) + TimeDelta::days(365));
        assert_eq!(dates.bound.last_date(), at(2022, 6, 10, 0, 0));
    }

    #[test]
    fn test_stored_values_take_precedence() {
        let now = at(2021, 1, 1, 9, 0);
        let config = config_with(Some("2021-06-10"), Some("2021-06-01"), Some("2021-08-01"));
        let stored = StoredValues {
            start_date: Some("2021-06-15T10:15:00".to_owned()),
            first_date: Some("2021-13-01".to_owned()),
            last_date: Some("2021-09-01".to_owned()),
            end_date: None,
        };
        let dates = resolve_initial_dates(now, &config, &stored);

        assert_eq!(dates.start, at(2021, 6, 15, 10, 30));
        assert_eq!(dates.bound.first_date(), at(2021, 6, 1, 0, 0));
        assert_eq!(dates.bound.last_date(), at(2021, 9, 1, 0, 0));
    }

    #[test]
    fn test_rounding_applies_to_all_three() {
        let now = at(2021, 1, 1, 9, 0);
        let config = PickerConfig {
            start_date: Some(at(2021, 6, 10, 8, 5).into()),
            first_date: Some(at(2021, 6, 1, 7, 45).into()),
            last_date: Some(at(2021, 7, 1, 23, 59).into()),
            ..PickerConfig::default()
        };
        let dates = resolve_initial_dates(now, &config, &StoredValues::default());

        assert_eq!(dates.start, at(2021, 6, 10, 8, 30));
        assert_eq!(dates.bound.first_date(), at(2021, 6, 1, 8, 0));
        assert_eq!(dates.bound.last_date(), at(2021, 7, 2, 0, 0));
    }

    #[test]
    fn test_instants_near_range_end_do_not_overflow() {
        let config = PickerConfig {
            start_date: Some(NaiveDateTime::MAX.into()),
            ..PickerConfig::default()
        };
        let dates = resolve_initial_dates(NaiveDateTime::MAX, &config, &StoredValues::default());

        assert!(dates.bound.first_date() <= dates.start);
        assert!(dates.start <= dates.bound.last_date());
        assert_eq!(dates.start.minute(), 30);
    }

    #[test]
    fn test_extend_to() {
        let mut bound = Bound::new(at(2021, 6, 10, 0, 0), at(2021, 6, 20, 0, 0)).expect("valid bound");
        bound.extend_to(at(2021, 6, 15, 0, 0));
        assert_eq!(bound.last_date(), at(2021, 6, 20, 0, 0));
        bound.extend_to(at(2021, 6, 25, 0, 0));
        assert_eq!(bound.last_date(), at(2021, 6, 25, 0, 0));
    }
}
