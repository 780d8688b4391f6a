//! Turning loosely-typed date inputs into definitive instants.
//!
//! Inputs arrive from three places: hidden fields carrying a previously chosen
//! value, the caller's configuration, and built-in defaults. Invalid inputs are
//! never reported; they simply lose to the next source in line.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Instant;
use crate::consts::SLOT_MINUTES;
use crate::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_ONLY_LEN: usize = 10;
const DATE_TIME_LEN: usize = 19;

/// A caller-supplied date: either a concrete instant or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Instant(NaiveDateTime),
    Iso(String),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Iso(value.to_owned())
    }
}

impl DateInput {
    /// Returns the instant this input denotes, if it denotes one.
    pub fn to_instant(&self) -> Option<Instant> {
        match self {
            Self::Instant(instant) => Some(*instant),
            Self::Iso(s) => parse_iso(s),
        }
    }
}

#[allow(clippy::expect_used)]
fn iso_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}:[0-9]{2}([+-][0-9]{2}:[0-9]{2}|Z)?)?$")
            .expect("ISO-8601 pattern must compile")
    })
}

/// Lexical check against `YYYY-MM-DD[THH:mm:ss[±HH:mm|Z]]`.
///
/// No calendar validation happens here: `"2021-13-40"` passes.
pub fn is_iso_format(s: &str) -> bool {
    iso_pattern().is_match(s)
}

/// Parses an ISO-8601 string into a local wall-clock instant.
///
/// Date-only strings denote local midnight. Strings carrying a zone (`Z` or an
/// offset) are converted to local time. Returns `None` when the string fails the
/// lexical check or names an impossible calendar date.
pub fn parse_iso(s: &str) -> Option<Instant> {
    if !is_iso_format(s) {
        return None;
    }

    match s.len() {
        DATE_ONLY_LEN => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        DATE_TIME_LEN => NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).ok(),
        _ => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local()),
    }
}

/// Picks one definitive instant.
///
/// Precedence, highest first: a valid `stored` value, a valid `param`, `default`.
pub fn resolve_date(default: Instant, param: Option<&DateInput>, stored: Option<&str>) -> Instant {
    if let Some(raw) = stored.filter(|s| !s.is_empty()) {
        match parse_iso(raw) {
            Some(instant) => return instant,
            None => log::warn!("ignoring stored date {raw:?}: not a valid ISO-8601 date"),
        }
    }

    if let Some(input) = param {
        match input.to_instant() {
            Some(instant) => return instant,
            None => log::warn!("ignoring date parameter {input:?}: not a valid date"),
        }
    }

    default
}

fn slot_length() -> TimeDelta {
    TimeDelta::minutes(i64::from(SLOT_MINUTES))
}

/// `instant + delta`, stopping at the ends of the representable range.
pub fn saturating_add(instant: Instant, delta: TimeDelta) -> Instant {
    instant.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

/// Drops seconds and sub-seconds, then moves down to the enclosing half hour.
pub fn floor_to_half_hour(instant: Instant) -> Instant {
    instant
        - TimeDelta::minutes(i64::from(instant.minute() % SLOT_MINUTES))
        - TimeDelta::seconds(i64::from(instant.second()))
        - TimeDelta::nanoseconds(i64::from(instant.nanosecond()))
}

/// Drops seconds and sub-seconds, then rounds minutes up to the next `:00` or `:30`.
///
/// Minutes in `1..=30` become 30, minutes in `31..=59` become 0 of the next hour
/// (rolling over into the next day at midnight). Rounding never goes backwards so a
/// rounded "now" is never a slot in the past, except in the last half hour of the
/// representable range where the slot start is kept.
pub fn round_to_half_hour(instant: Instant) -> Instant {
    let minute_start = instant
        - TimeDelta::seconds(i64::from(instant.second()))
        - TimeDelta::nanoseconds(i64::from(instant.nanosecond()));
    let slot_start = floor_to_half_hour(instant);

    if slot_start == minute_start {
        slot_start
    } else {
        slot_start.checked_add_signed(slot_length()).unwrap_or(slot_start)
    }
}
