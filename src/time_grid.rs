use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::Instant;
use crate::consts::{SLOTS_PER_DAY, SLOT_MINUTES, TIME_GRID_COLUMNS};
use crate::range::Bound;
use crate::types::{CellClass, Endpoint};

/// One half-hour slot of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub hour:    u32,
    pub minute:  u32,
    pub instant: Instant,
    #[serde(serialize_with = "CellClass::serialize_tags")]
    pub class:   CellClass,
    /// Endpoint whose selected time this slot shows, if any
    pub marker:  Option<Endpoint>,
}

impl TimeSlot {
    /// `HH:mm` label
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// The 48 slots of a day from 00:00 to 23:30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGrid {
    day:   NaiveDate,
    slots: Vec<TimeSlot>,
}

impl TimeGrid {
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Slots laid out six to a row
    pub fn rows(&self) -> impl Iterator<Item = &[TimeSlot]> {
        self.slots.chunks(TIME_GRID_COLUMNS)
    }

    pub fn slot(&self, hour: u32, minute: u32) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.hour == hour && s.minute == minute)
    }
}

/// Builds the slot grid for the day of `selected`.
///
/// Slots outside `bound` (time of day included) are disabled. The selectable
/// slot whose `HH:mm` equals the selection is marked for `active`.
pub fn build_day(selected: Instant, bound: &Bound, active: Endpoint) -> TimeGrid {
    let day = selected.date();
    let midnight = NaiveDateTime::new(day, NaiveTime::MIN);

    let slots: Vec<TimeSlot> = (0..SLOTS_PER_DAY)
        .map(|i| {
            #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let instant = midnight + TimeDelta::minutes(i as i64 * i64::from(SLOT_MINUTES));
            let (hour, minute) = (instant.hour(), instant.minute());

            let mut class = if bound.contains(instant) {
                CellClass::SELECTABLE
            } else {
                CellClass::DISABLED
            };

            let marker = if class.is_selectable()
                && hour == selected.hour()
                && minute == selected.minute()
            {
                class |= CellClass::TIME_SELECTED
                    | match active {
                        Endpoint::Start => CellClass::START_SELECTED,
                        Endpoint::End => CellClass::END_SELECTED,
                    };
                Some(active)
            } else {
                None
            };

            TimeSlot {
                hour,
                minute,
                instant,
                class,
                marker,
            }
        })
        .collect();

    log::trace!("built time grid for {day} ({active})");
    TimeGrid { day, slots }
}
