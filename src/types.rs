use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
};
use crate::prelude::*;

/// One of the two pickers of an interval.
/// A single-date picker only has `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "end")]
    End,
}

impl Endpoint {
    /// Returns the opposite endpoint
    pub const fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Which of the two panels of an endpoint a button opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "time")]
    Time,
}

/// Month a calendar cell belongs to, relative to the month being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthContext {
    #[display(fmt = "prev-month")]
    Prev,
    #[display(fmt = "current-month")]
    Current,
    #[display(fmt = "next-month")]
    Next,
}

/// Direction of a month navigation click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MonthStep {
    #[display(fmt = "prev")]
    Prev,
    #[display(fmt = "next")]
    Next,
}

bitflags::bitflags! {
    /// Combinable classification of a rendered grid cell.
    /// Computed fresh on every render, never stored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellClass: u8 {
        const SELECTABLE = 1;
        const DISABLED = 1 << 1;
        const TODAY = 1 << 2;
        const START_SELECTED = 1 << 3;
        const END_SELECTED = 1 << 4;
        const IN_RANGE = 1 << 5;
        const TIME_SELECTED = 1 << 6;
    }
}

impl CellClass {
    const TAGS: [(Self, &'static str); 7] = [
        (Self::SELECTABLE, "selectable"),
        (Self::DISABLED, "disabled"),
        (Self::TODAY, "today"),
        (Self::START_SELECTED, "start-selected"),
        (Self::END_SELECTED, "end-selected"),
        (Self::IN_RANGE, "in-range"),
        (Self::TIME_SELECTED, "time-selected"),
    ];

    /// Whether a click on this cell may change the selection
    pub const fn is_selectable(self) -> bool {
        self.contains(Self::SELECTABLE)
    }

    /// Iterates the tag names in a stable order
    pub fn tags(self) -> impl Iterator<Item = &'static str> {
        Self::TAGS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, tag)| tag)
    }

    /// Serializes the class as a list of tag names
    pub(crate) fn serialize_tags<S>(class: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(class.tags())
    }
}

impl fmt::Display for CellClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!(month != 0 && month <= 12);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_other() {
        assert_eq!(Endpoint::Start.other(), Endpoint::End);
        assert_eq!(Endpoint::End.other(), Endpoint::Start);
    }

    #[test]
    fn test_enum_display() {
        assert_eq!(Endpoint::Start.to_string(), "start");
        assert_eq!(PickerKind::Time.to_string(), "time");
        assert_eq!(MonthContext::Prev.to_string(), "prev-month");
        assert_eq!(MonthStep::Next.to_string(), "next");
    }

    #[test]
    fn test_endpoint_serde() {
        let json = serde_json::to_string(&Endpoint::End).expect("serialize endpoint");
        assert_eq!(json, r#""end""#);
        let parsed: Endpoint = serde_json::from_str(r#""start""#).expect("deserialize endpoint");
        assert_eq!(parsed, Endpoint::Start);
    }

    #[test]
    fn test_cell_class_display() {
        let class = CellClass::SELECTABLE | CellClass::TODAY | CellClass::START_SELECTED;
        assert_eq!(class.to_string(), "selectable today start-selected");
        assert_eq!(CellClass::DISABLED.to_string(), "disabled");
        assert_eq!(CellClass::empty().to_string(), "");
    }

    #[test]
    fn test_cell_class_selectable() {
        assert!(CellClass::SELECTABLE.is_selectable());
        assert!(!(CellClass::DISABLED | CellClass::TODAY).is_selectable());
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year:        i32,
            is_leap:     bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2024,
                is_leap:     true,
                description: "divisible by 4",
            },
            TestCase {
                year:        2023,
                is_leap:     false,
                description: "not divisible by 4",
            },
            TestCase {
                year:        1900,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2100,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2000,
                is_leap:     true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_days_in_month() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for month in 1..=12u32 {
            assert_eq!(
                days_in_month(2023, month),
                expected[month as usize],
                "Month {month} has incorrect day count"
            );
        }
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29, "Century year divisible by 400");
    }
}
