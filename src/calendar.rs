//! Month grid with spillover days and per-cell classification.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::Instant;
use crate::consts::{DAYS_PER_WEEK, MONTH_NAME_KEYS};
use crate::range::Bound;
use crate::types::{CellClass, MonthContext, days_in_month};
use crate::week::DayOrder;

/// One day of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date:  NaiveDate,
    pub month: MonthContext,
    #[serde(serialize_with = "CellClass::serialize_tags")]
    pub class: CellClass,
}

impl DayCell {
    /// Day of month shown in the cell
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// A fully classified month, ready for the render sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    /// Instant the grid was built for; its year and month are the ones shown
    view:         Instant,
    /// Last day of the previous month at the view's hour and minute
    prev_month:   Instant,
    /// First day of the next month at the view's hour and minute
    next_month:   Instant,
    prev_enabled: bool,
    next_enabled: bool,
    weekdays:     [&'static str; DAYS_PER_WEEK],
    cells:        Vec<DayCell>,
}

impl MonthGrid {
    pub const fn view(&self) -> Instant {
        self.view
    }

    pub fn year(&self) -> i32 {
        self.view.year()
    }

    pub fn month(&self) -> u32 {
        self.view.month()
    }

    /// Label key of the month name (`"june"`)
    pub fn month_key(&self) -> &'static str {
        MONTH_NAME_KEYS[self.view.month0() as usize]
    }

    /// Weekday label keys in column order
    pub const fn weekdays(&self) -> &[&'static str; DAYS_PER_WEEK] {
        &self.weekdays
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Cells grouped into weeks of seven
    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Reference instant for cells of the given month context
    pub const fn reference(&self, month: MonthContext) -> Instant {
        match month {
            MonthContext::Prev => self.prev_month,
            MonthContext::Current => self.view,
            MonthContext::Next => self.next_month,
        }
    }

    /// Whether the previous month may be shown
    pub const fn prev_enabled(&self) -> bool {
        self.prev_enabled
    }

    /// Whether the next month may be shown
    pub const fn next_enabled(&self) -> bool {
        self.next_enabled
    }

    /// The calendar day a click on `day` in a cell of `month` refers to.
    ///
    /// Only days the grid actually shows in that month context resolve.
    pub fn resolve_day(&self, day: u32, month: MonthContext) -> Option<NaiveDate> {
        let date = self.reference(month).date().with_day(day)?;
        self.cell(date)
            .filter(|cell| cell.month == month)
            .map(|cell| cell.date)
    }

    /// Finds the cell showing `date`, if any
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }
}

/// Builds and classifies month grids against a bound and the current selection.
#[derive(Debug, Clone, Copy)]
pub struct CalendarGridBuilder<'a> {
    bound:              &'a Bound,
    order:              &'a DayOrder,
    today:              NaiveDate,
    selected_start:     Option<NaiveDate>,
    selected_end:       Option<NaiveDate>,
    highlight_interval: bool,
}

impl<'a> CalendarGridBuilder<'a> {
    pub const fn new(bound: &'a Bound, order: &'a DayOrder, today: NaiveDate) -> Self {
        Self {
            bound,
            order,
            today,
            selected_start: None,
            selected_end: None,
            highlight_interval: false,
        }
    }

    /// Sets the selected start and (for intervals) end instants
    #[must_use]
    pub fn selection(mut self, start: Instant, end: Option<Instant>) -> Self {
        self.selected_start = Some(start.date());
        self.selected_end = end.map(|e| e.date());
        self
    }

    /// Mark the end day and shade the days strictly between start and end
    #[must_use]
    pub const fn highlight_interval(mut self, highlight: bool) -> Self {
        self.highlight_interval = highlight;
        self
    }

    /// Classification of a single day.
    ///
    /// Days outside the bound (compared without time of day) are disabled,
    /// everything else is selectable. The remaining tags stack on top.
    pub fn classify(&self, date: NaiveDate) -> CellClass {
        let mut class = if self.bound.contains_day(date) {
            CellClass::SELECTABLE
        } else {
            CellClass::DISABLED
        };

        if date == self.today {
            class |= CellClass::TODAY;
        }
        if Some(date) == self.selected_start {
            class |= CellClass::START_SELECTED;
        }

        if self.highlight_interval {
            if let Some(end) = self.selected_end {
                if date == end {
                    class |= CellClass::END_SELECTED;
                }
                if self.selected_start.is_some_and(|start| start < date && date < end) {
                    class |= CellClass::IN_RANGE;
                }
            }
        }

        class
    }

    /// Builds the grid for the month containing `view`.
    ///
    /// Leading cells come from the previous month (as many as the weekday column
    /// of day 1), trailing cells from the next month pad the last week to seven.
    pub fn build_month(&self, view: Instant) -> MonthGrid {
        let year = view.year();
        let month = view.month();
        let first = view.date() - TimeDelta::days(i64::from(view.day0()));
        let month_len = days_in_month(year, month) as usize;

        let lead = self.order.weekday_index(first);
        let total = (lead + month_len).div_ceil(DAYS_PER_WEEK) * DAYS_PER_WEEK;
        let grid_start = first.checked_sub_days(Days::new(lead as u64)).unwrap_or(first);

        let cells: Vec<DayCell> = grid_start
            .iter_days()
            .take(total)
            .map(|date| {
                let context = if date < first {
                    MonthContext::Prev
                } else if date.month() == month {
                    MonthContext::Current
                } else {
                    MonthContext::Next
                };
                DayCell {
                    date,
                    month: context,
                    class: self.classify(date),
                }
            })
            .collect();

        // At the ends of the representable range there is no neighbouring month
        let time = NaiveTime::MIN + TimeDelta::minutes(i64::from(view.hour() * 60 + view.minute()));
        let prev_day = first.pred_opt();
        let next_day = first.checked_add_days(Days::new(month_len as u64));
        let prev_month = NaiveDateTime::new(prev_day.unwrap_or(first), time);
        let next_month = NaiveDateTime::new(next_day.unwrap_or(first), time);

        log::trace!(
            "built {year}-{month:02} grid: {} cells, {lead} leading",
            cells.len()
        );

        MonthGrid {
            view,
            prev_month,
            next_month,
            prev_enabled: prev_day.is_some() && prev_month >= self.bound.first_date(),
            next_enabled: next_day.is_some() && self.bound.last_date() > next_month,
            weekdays: self.order.keys(),
            cells,
        }
    }
}
