use std::collections::HashMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FIRST_DAY_NO, DEFAULT_MIN_INTERVAL_HOURS};
use crate::display::DateOutput;
use crate::resolve::DateInput;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Settings consumed once, when a picker is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Label overrides, handed to the display sink untouched
    pub i18n:               Option<HashMap<String, String>>,
    pub date_output:        DateOutput,
    pub min_interval_hours: Option<f64>,
    pub start_date:         Option<DateInput>,
    pub first_date:         Option<DateInput>,
    pub last_date:          Option<DateInput>,
    pub end_date:           Option<DateInput>,
    /// First day of the displayed week, 0 = Sunday
    pub first_day_no:       i64,
    /// Shade the days between start and end and mark the end day
    pub highlight_interval: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            i18n:               None,
            date_output:        DateOutput::default(),
            min_interval_hours: None,
            start_date:         None,
            first_date:         None,
            last_date:          None,
            end_date:           None,
            first_day_no:       DEFAULT_FIRST_DAY_NO,
            highlight_interval: false,
        }
    }
}

impl PickerConfig {
    /// Minimum gap between start and end.
    ///
    /// Missing, zero, negative or non-finite hour counts fall back to one hour.
    pub fn min_interval(&self) -> TimeDelta {
        let hours = match self.min_interval_hours {
            Some(h) if h.is_finite() && h > 0.0 => h,
            Some(h) if h != 0.0 => {
                log::warn!("min_interval_hours {h} is not a positive number, using default");
                DEFAULT_MIN_INTERVAL_HOURS
            }
            _ => DEFAULT_MIN_INTERVAL_HOURS,
        };

        // Float to int casts saturate, anything beyond the range becomes the maximum
        #[allow(clippy::cast_possible_truncation)]
        let ms = (hours * MS_PER_HOUR).round() as i64;
        TimeDelta::try_milliseconds(ms).unwrap_or(TimeDelta::MAX)
    }
}

/// Values left behind by an earlier session in the page's hidden fields.
/// They take precedence over everything in [`PickerConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredValues {
    pub start_date: Option<String>,
    pub first_date: Option<String>,
    pub last_date:  Option<String>,
    pub end_date:   Option<String>,
}
