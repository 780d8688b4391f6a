//! Display snapshot pushed to the host after every committed selection.

use std::str::FromStr;

use chrono::{Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::{Instant, PickerError};
use crate::consts::MONTH_KEYS;
use crate::prelude::*;
use crate::week::weekday_key;

const FULL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const SHORT_ISO_FORMAT: &str = "%Y-%m-%d";
const MS_PER_SECOND: i64 = 1000;

/// Encoding of the value written to the host's output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum DateOutput {
    /// `YYYY-MM-DDTHH:mm:ss.sss`, local wall clock, no zone suffix
    #[display(fmt = "full_ISO")]
    #[serde(rename = "full_ISO")]
    FullIso,
    /// `YYYY-MM-DD`
    #[default]
    #[display(fmt = "short_ISO")]
    #[serde(rename = "short_ISO")]
    ShortIso,
    /// Unix seconds, rounded
    #[display(fmt = "timestamp")]
    #[serde(rename = "timestamp")]
    Timestamp,
}

impl FromStr for DateOutput {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full_ISO" => Ok(Self::FullIso),
            "short_ISO" => Ok(Self::ShortIso),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(PickerError::UnknownDateOutput(other.to_owned())),
        }
    }
}

/// Formats `instant` with the given encoding.
pub fn format_output(instant: Instant, encoding: DateOutput) -> String {
    match encoding {
        DateOutput::FullIso => instant.format(FULL_ISO_FORMAT).to_string(),
        DateOutput::ShortIso => instant.format(SHORT_ISO_FORMAT).to_string(),
        DateOutput::Timestamp => unix_seconds(instant).to_string(),
    }
}

/// Unix time of a local wall-clock instant, rounded to the nearest second.
/// Wall-clock times skipped by a DST jump are read as UTC.
fn unix_seconds(instant: Instant) -> i64 {
    let ms = Local
        .from_local_datetime(&instant)
        .earliest()
        .map_or_else(|| instant.and_utc().timestamp_millis(), |dt| dt.timestamp_millis());
    (ms + MS_PER_SECOND / 2).div_euclid(MS_PER_SECOND)
}

/// Labels and output value describing one endpoint's selection.
///
/// `weekday` and `month` are label keys (`"wed"`, `"jun"`); translating them is
/// up to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateDisplay {
    pub weekday:  &'static str,
    pub day:      String,
    pub month:    &'static str,
    pub year:     i32,
    pub hour:     String,
    pub minute:   String,
    pub output:   String,
    pub encoding: DateOutput,
}

impl DateDisplay {
    pub fn new(instant: Instant, encoding: DateOutput) -> Self {
        Self {
            weekday: weekday_key(instant.weekday()),
            day: format!("{:02}", instant.day()),
            month: MONTH_KEYS[instant.month0() as usize],
            year: instant.year(),
            hour: format!("{:02}", instant.hour()),
            minute: format!(":{:02}", instant.minute()),
            output: format_output(instant, encoding),
            encoding,
        }
    }
}
