mod calendar;
mod clock;
mod config;
mod consts;
mod controller;
mod display;
mod interval;
mod prelude;
mod range;
mod resolve;
mod time_grid;
mod types;
mod week;

#[cfg(test)]
mod test_utils;

pub use calendar::{CalendarGridBuilder, DayCell, MonthGrid};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{PickerConfig, StoredValues};
pub use consts::*;
pub use controller::{CloseTicket, IntervalPicker, PanelState, PickerSink};
pub use display::{DateDisplay, DateOutput, format_output};
pub use interval::IntervalConstraint;
pub use range::{Bound, InitialDates, RangeError, resolve_initial_dates};
pub use resolve::{
    DateInput, floor_to_half_hour, is_iso_format, parse_iso, resolve_date, round_to_half_hour, saturating_add,
};
pub use time_grid::{TimeGrid, TimeSlot, build_day};
pub use types::{
    CellClass, Endpoint, MonthContext, MonthStep, PickerKind, days_in_month, is_leap_year,
};
pub use week::{DayOrder, weekday_key};

use crate::prelude::*;

/// A point in local wall-clock time. Not zone aware.
pub type Instant = chrono::NaiveDateTime;

/// Why a click on a grid cell or button did not change the selection.
/// The picker state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{year}-{month:02} has no day {day}")]
    NoSuchDay { year: i32, month: u32, day: u32 },
    #[error("No time slot starts at {hour:02}:{minute:02}")]
    NoSuchSlot { hour: u32, minute: u32 },
    #[error("{date} is outside the selectable window")]
    OutOfBound { date: Instant },
    /// Keeping the minimum interval would move `endpoint` out of the bound.
    #[error("Minimum interval would push the {endpoint} selection outside the selectable window")]
    IntervalOutOfBound { endpoint: Endpoint },
    #[error("Picker has no end endpoint")]
    NoEndEndpoint,
    #[error("The {kind} panel of the {endpoint} endpoint is not open")]
    PanelNotOpen { endpoint: Endpoint, kind: PickerKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PickerError {
    #[display(fmt = "Unknown date output encoding: {_0}")]
    UnknownDateOutput(String),
    #[display(fmt = "{_0}")]
    Selection(SelectionError),
    #[display(fmt = "{_0}")]
    Range(RangeError),
}

impl std::error::Error for PickerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownDateOutput(_) => None,
            Self::Selection(err) => Some(err),
            Self::Range(err) => Some(err),
        }
    }
}

impl From<SelectionError> for PickerError {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

impl From<RangeError> for PickerError {
    fn from(err: RangeError) -> Self {
        Self::Range(err)
    }
}
