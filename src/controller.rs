//! State machine driving the date and time panels of one or two endpoints.
//!
//! The picker owns all selection state. Hosts forward clicks to it and receive
//! fully classified grids and display snapshots through a [`PickerSink`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, TimeDelta};

use crate::{Instant, SelectionError};
use crate::calendar::{CalendarGridBuilder, MonthGrid};
use crate::clock::{Clock, SystemClock};
use crate::config::{PickerConfig, StoredValues};
use crate::consts::CLOSE_DELAY_MS;
use crate::display::{DateDisplay, DateOutput, format_output};
use crate::interval::IntervalConstraint;
use crate::prelude::*;
use crate::range::{Bound, InitialDates, resolve_initial_dates};
use crate::time_grid::{TimeGrid, build_day};
use crate::types::{Endpoint, MonthContext, MonthStep, PickerKind};
use crate::week::DayOrder;

const INTERVAL_ENDPOINTS: &[Endpoint] = &[Endpoint::Start, Endpoint::End];
const SINGLE_ENDPOINT: &[Endpoint] = &[Endpoint::Start];
const KINDS: [PickerKind; 2] = [PickerKind::Date, PickerKind::Time];

/// Receives everything the picker wants shown. Implemented by the host UI.
pub trait PickerSink {
    /// Shows the calendar panel of `endpoint` with the given grid
    fn render_month(&mut self, endpoint: Endpoint, grid: &MonthGrid);

    /// Shows the time panel of `endpoint` with the given grid
    fn render_time(&mut self, endpoint: Endpoint, grid: &TimeGrid);

    /// Updates the labels and the output value of `endpoint`
    fn show_selection(&mut self, endpoint: Endpoint, display: &DateDisplay);

    fn set_button_active(&mut self, endpoint: Endpoint, kind: PickerKind, active: bool);

    /// Hides whichever panel of `endpoint` is visible
    fn hide_panel(&mut self, endpoint: Endpoint);

    /// Starts or stops reporting pointer and touch events outside the picker
    fn listen_outside(&mut self, listen: bool);
}

/// Panel state of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum PanelState {
    #[default]
    #[display(fmt = "closed")]
    Closed,
    #[display(fmt = "date-open")]
    DateOpen,
    #[display(fmt = "time-open")]
    TimeOpen,
}

impl PanelState {
    /// The open state for a panel kind
    pub const fn open(kind: PickerKind) -> Self {
        match kind {
            PickerKind::Date => Self::DateOpen,
            PickerKind::Time => Self::TimeOpen,
        }
    }

    /// Kind of the open panel, `None` when closed
    pub const fn kind(self) -> Option<PickerKind> {
        match self {
            Self::Closed => None,
            Self::DateOpen => Some(PickerKind::Date),
            Self::TimeOpen => Some(PickerKind::Time),
        }
    }

    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndpointState {
    selected: Instant,
    /// Instant whose month the calendar shows
    view:     Instant,
    panel:    PanelState,
    /// Panel still on screen, possibly waiting for a deferred close
    visible:  bool,
    /// Bumped every time a panel of this endpoint opens
    opened:   u64,
}

impl EndpointState {
    const fn new(selected: Instant) -> Self {
        Self {
            selected,
            view: selected,
            panel: PanelState::Closed,
            visible: false,
            opened: 0,
        }
    }
}

/// Handle for a panel close deferred after a selection.
///
/// The host passes it back to [`IntervalPicker::finish_close`] once
/// [`CloseTicket::delay`] has elapsed. Reopening a panel of the same endpoint in
/// between makes the ticket stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{endpoint}#{generation}")]
pub struct CloseTicket {
    endpoint:   Endpoint,
    generation: u64,
}

impl CloseTicket {
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub const fn delay(&self) -> Duration {
        Duration::from_millis(CLOSE_DELAY_MS)
    }
}

/// A single-date or interval date/time picker.
#[derive(Debug)]
pub struct IntervalPicker<S, C = SystemClock> {
    sink:               S,
    clock:              C,
    order:              DayOrder,
    bound:              Bound,
    constraint:         IntervalConstraint,
    encoding:           DateOutput,
    highlight_interval: bool,
    i18n:               Option<HashMap<String, String>>,
    start:              EndpointState,
    end:                Option<EndpointState>,
    active_mode:        Endpoint,
}

impl<S: PickerSink, C: Clock> IntervalPicker<S, C> {
    /// Creates an interval picker with a start and an end endpoint.
    ///
    /// Every endpoint's selection is pushed to the sink before returning.
    pub fn new(config: PickerConfig, stored: &StoredValues, sink: S, clock: C) -> Self {
        Self::build(config, stored, sink, clock, true)
    }

    /// Creates a picker with only the start endpoint
    pub fn single(config: PickerConfig, stored: &StoredValues, sink: S, clock: C) -> Self {
        Self::build(config, stored, sink, clock, false)
    }

    fn build(config: PickerConfig, stored: &StoredValues, sink: S, clock: C, interval: bool) -> Self {
        let InitialDates { start, mut bound } = resolve_initial_dates(clock.now(), &config, stored);
        let constraint = IntervalConstraint::new(config.min_interval());
        let end = interval.then(|| constraint.resolve_end(start, &mut bound, &config, stored));

        log::debug!("picker created: start {start}, end {end:?}, bound {bound}");

        let mut picker = Self {
            sink,
            clock,
            order: DayOrder::new(config.first_day_no),
            bound,
            constraint,
            encoding: config.date_output,
            highlight_interval: config.highlight_interval,
            i18n: config.i18n,
            start: EndpointState::new(start),
            end: end.map(EndpointState::new),
            active_mode: Endpoint::Start,
        };

        for &endpoint in picker.endpoints() {
            picker.show(endpoint);
        }
        picker
    }

    /// Endpoints this picker has
    pub const fn endpoints(&self) -> &'static [Endpoint] {
        if self.end.is_some() {
            INTERVAL_ENDPOINTS
        } else {
            SINGLE_ENDPOINT
        }
    }

    pub const fn is_interval(&self) -> bool {
        self.end.is_some()
    }

    /// Endpoint the last opened panel belongs to
    pub const fn active_mode(&self) -> Endpoint {
        self.active_mode
    }

    /// Panel state of `endpoint`. Missing endpoints are always closed.
    pub fn state(&self, endpoint: Endpoint) -> PanelState {
        self.endpoint(endpoint).map_or(PanelState::Closed, |state| state.panel)
    }

    pub fn selected(&self, endpoint: Endpoint) -> Option<Instant> {
        self.endpoint(endpoint).ok().map(|state| state.selected)
    }

    /// Current output value of `endpoint` in the configured encoding
    pub fn output(&self, endpoint: Endpoint) -> Option<String> {
        self.selected(endpoint).map(|selected| format_output(selected, self.encoding))
    }

    pub const fn bound(&self) -> &Bound {
        &self.bound
    }

    pub const fn day_order(&self) -> &DayOrder {
        &self.order
    }

    pub const fn min_interval(&self) -> TimeDelta {
        self.constraint.min_interval()
    }

    /// Label overrides from the configuration
    pub fn i18n(&self) -> Option<&HashMap<String, String>> {
        self.i18n.as_ref()
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The calendar `endpoint` shows, classified against the current selection.
    ///
    /// # Errors
    /// Returns `SelectionError::NoEndEndpoint` for `End` on a single-date picker.
    pub fn month_grid(&self, endpoint: Endpoint) -> Result<MonthGrid, SelectionError> {
        let view = self.endpoint(endpoint)?.view;
        Ok(CalendarGridBuilder::new(&self.bound, &self.order, self.clock.today())
            .selection(self.start.selected, self.end.map(|end| end.selected))
            .highlight_interval(self.highlight_interval)
            .build_month(view))
    }

    /// The time slots of the day `endpoint` has selected.
    ///
    /// # Errors
    /// Returns `SelectionError::NoEndEndpoint` for `End` on a single-date picker.
    pub fn time_grid(&self, endpoint: Endpoint) -> Result<TimeGrid, SelectionError> {
        let selected = self.endpoint(endpoint)?.selected;
        Ok(build_day(selected, &self.bound, endpoint))
    }

    /// Handles a click on the date or time button of `endpoint`.
    ///
    /// Clicking the button of the open panel closes it. Otherwise every other
    /// panel is closed, the requested one is rendered and outside interactions
    /// are reported until it closes again.
    ///
    /// # Errors
    /// Returns `SelectionError::NoEndEndpoint` for `End` on a single-date picker.
    pub fn open_picker(&mut self, endpoint: Endpoint, kind: PickerKind) -> Result<(), SelectionError> {
        let target = PanelState::open(kind);
        if self.endpoint(endpoint)?.panel == target {
            self.settle(endpoint, kind);
            self.detach(endpoint);
            log::debug!("{endpoint} {kind} panel toggled closed");
            return Ok(());
        }

        for &other in self.endpoints() {
            for other_kind in KINDS {
                if (other, other_kind) != (endpoint, kind) {
                    self.sink.set_button_active(other, other_kind, false);
                }
            }
            let state = self.endpoint_mut(other)?;
            state.panel = PanelState::Closed;
            // A panel waiting for its deferred close is still on screen
            if state.visible && other != endpoint {
                state.visible = false;
                self.sink.hide_panel(other);
            }
        }

        self.active_mode = endpoint;
        let state = self.endpoint_mut(endpoint)?;
        state.panel = target;
        state.view = state.selected;
        state.visible = true;
        state.opened += 1;

        self.sink.set_button_active(endpoint, kind, true);
        self.render(endpoint, kind)?;
        self.sink.listen_outside(true);

        log::debug!("{endpoint} {kind} panel opened");
        Ok(())
    }

    /// # Errors
    /// See [`IntervalPicker::open_picker`].
    pub fn open_date_picker(&mut self, endpoint: Endpoint) -> Result<(), SelectionError> {
        self.open_picker(endpoint, PickerKind::Date)
    }

    /// # Errors
    /// See [`IntervalPicker::open_picker`].
    pub fn open_time_picker(&mut self, endpoint: Endpoint) -> Result<(), SelectionError> {
        self.open_picker(endpoint, PickerKind::Time)
    }

    /// Handles a click on a day cell of the open calendar.
    ///
    /// The clicked day replaces the date of the selection while the time of day
    /// stays as it was. The panel counts as closed right away; hiding it is left
    /// to the returned ticket.
    ///
    /// # Errors
    /// Fails without changing anything when the calendar of `endpoint` is not
    /// open, the day does not exist, the day is disabled, or the minimum interval
    /// cannot be kept inside the bound.
    pub fn select_day(
        &mut self,
        endpoint: Endpoint,
        day: u32,
        month: MonthContext,
    ) -> Result<CloseTicket, SelectionError> {
        self.require_open(endpoint, PickerKind::Date)?;

        let grid = self.month_grid(endpoint)?;
        let reference = grid.reference(month);
        let date = grid
            .resolve_day(day, month)
            .ok_or(SelectionError::NoSuchDay {
                year: reference.year(),
                month: reference.month(),
                day,
            })?;

        let candidate = NaiveDateTime::new(date, self.endpoint(endpoint)?.selected.time());
        if !self.bound.contains_day(date) {
            return Err(SelectionError::OutOfBound { date: candidate });
        }

        self.commit(endpoint, candidate)?;
        self.endpoint_mut(endpoint)?.view = candidate;
        self.render(endpoint, PickerKind::Date)?;

        log::debug!("{endpoint} day set to {date}");
        Ok(self.close_later(endpoint, PickerKind::Date))
    }

    /// Handles a click on a slot of the open time panel.
    ///
    /// # Errors
    /// Fails without changing anything when the time panel of `endpoint` is not
    /// open, no slot starts at `hour:minute`, the slot is disabled, or the
    /// minimum interval cannot be kept inside the bound.
    pub fn select_hour(&mut self, endpoint: Endpoint, hour: u32, minute: u32) -> Result<CloseTicket, SelectionError> {
        self.require_open(endpoint, PickerKind::Time)?;

        let grid = self.time_grid(endpoint)?;
        let slot = grid
            .slot(hour, minute)
            .ok_or(SelectionError::NoSuchSlot { hour, minute })?;
        if !slot.class.is_selectable() {
            return Err(SelectionError::OutOfBound { date: slot.instant });
        }

        self.commit(endpoint, slot.instant)?;
        self.render(endpoint, PickerKind::Time)?;

        log::debug!("{endpoint} time set to {}", slot.label());
        Ok(self.close_later(endpoint, PickerKind::Time))
    }

    /// Shows the previous or next month in the open calendar of `endpoint`.
    ///
    /// Returns `false` when navigation in that direction is disabled.
    ///
    /// # Errors
    /// Returns `SelectionError::PanelNotOpen` when the calendar is not open.
    pub fn navigate_month(&mut self, endpoint: Endpoint, step: MonthStep) -> Result<bool, SelectionError> {
        self.require_open(endpoint, PickerKind::Date)?;

        let grid = self.month_grid(endpoint)?;
        let (enabled, target) = match step {
            MonthStep::Prev => (grid.prev_enabled(), grid.reference(MonthContext::Prev)),
            MonthStep::Next => (grid.next_enabled(), grid.reference(MonthContext::Next)),
        };
        if !enabled {
            log::debug!("{step} month navigation disabled for {endpoint}");
            return Ok(false);
        }

        self.endpoint_mut(endpoint)?.view = target;
        self.render(endpoint, PickerKind::Date)?;

        log::debug!("{endpoint} calendar moved to {}-{:02}", target.year(), target.month());
        Ok(true)
    }

    /// Handles a pointer or touch event anywhere on the page.
    ///
    /// `target` is the endpoint whose container holds the event target, if any.
    /// Events outside the active endpoint close its open panel. Returns whether
    /// a panel was closed.
    pub fn on_outside_interaction(&mut self, target: Option<Endpoint>) -> bool {
        let active = self.active_mode;
        let Some(kind) = self.state(active).kind() else {
            return false;
        };
        if target == Some(active) {
            return false;
        }

        self.settle(active, kind);
        self.detach(active);
        log::debug!("{active} {kind} panel closed by outside interaction");
        true
    }

    /// Completes a deferred close. Stale tickets and panels that are already
    /// hidden are ignored.
    ///
    /// Returns whether the panel was hidden.
    pub fn finish_close(&mut self, ticket: CloseTicket) -> bool {
        let Ok(state) = self.endpoint(ticket.endpoint) else {
            return false;
        };
        if ticket.generation != state.opened {
            log::debug!("ignoring stale close ticket {ticket}");
            return false;
        }
        if !state.visible {
            log::debug!("{} panel already hidden", ticket.endpoint);
            return false;
        }

        self.detach(ticket.endpoint);
        log::debug!("{} panel hidden", ticket.endpoint);
        true
    }

    fn endpoint(&self, endpoint: Endpoint) -> Result<&EndpointState, SelectionError> {
        match endpoint {
            Endpoint::Start => Ok(&self.start),
            Endpoint::End => self.end.as_ref().ok_or(SelectionError::NoEndEndpoint),
        }
    }

    fn endpoint_mut(&mut self, endpoint: Endpoint) -> Result<&mut EndpointState, SelectionError> {
        match endpoint {
            Endpoint::Start => Ok(&mut self.start),
            Endpoint::End => self.end.as_mut().ok_or(SelectionError::NoEndEndpoint),
        }
    }

    fn require_open(&self, endpoint: Endpoint, kind: PickerKind) -> Result<(), SelectionError> {
        if self.endpoint(endpoint)?.panel == PanelState::open(kind) {
            Ok(())
        } else {
            Err(SelectionError::PanelNotOpen { endpoint, kind })
        }
    }

    /// Applies a new selection for `endpoint`, moving the other endpoint when the
    /// minimum interval requires it.
    fn commit(&mut self, endpoint: Endpoint, candidate: Instant) -> Result<(), SelectionError> {
        let Some(end) = self.end.as_ref().map(|end| end.selected) else {
            self.start.selected = candidate;
            self.show(Endpoint::Start);
            return Ok(());
        };

        let (start, end) = match endpoint {
            Endpoint::Start => (candidate, end),
            Endpoint::End => (self.start.selected, candidate),
        };
        let (start, end) = self.constraint.repair(endpoint, start, end, &self.bound)?;

        let other = endpoint.other();
        let other_before = self.selected(other);

        self.start.selected = start;
        if let Some(state) = self.end.as_mut() {
            state.selected = end;
        }

        self.show(endpoint);
        if self.selected(other) != other_before {
            self.show(other);
        }
        Ok(())
    }

    fn render(&mut self, endpoint: Endpoint, kind: PickerKind) -> Result<(), SelectionError> {
        match kind {
            PickerKind::Date => {
                let grid = self.month_grid(endpoint)?;
                self.sink.render_month(endpoint, &grid);
            }
            PickerKind::Time => {
                let grid = self.time_grid(endpoint)?;
                self.sink.render_time(endpoint, &grid);
            }
        }
        Ok(())
    }

    fn show(&mut self, endpoint: Endpoint) {
        if let Some(selected) = self.selected(endpoint) {
            let display = DateDisplay::new(selected, self.encoding);
            self.sink.show_selection(endpoint, &display);
        }
    }

    /// Marks the panel closed and releases its button
    fn settle(&mut self, endpoint: Endpoint, kind: PickerKind) {
        if let Ok(state) = self.endpoint_mut(endpoint) {
            state.panel = PanelState::Closed;
        }
        self.sink.set_button_active(endpoint, kind, false);
    }

    /// Hides the panel and stops listening for outside interactions once no
    /// panel is open
    fn detach(&mut self, endpoint: Endpoint) {
        if let Ok(state) = self.endpoint_mut(endpoint) {
            state.visible = false;
        }
        self.sink.hide_panel(endpoint);
        if !self.endpoints().iter().any(|other| self.state(*other).is_open()) {
            self.sink.listen_outside(false);
        }
    }

    fn close_later(&mut self, endpoint: Endpoint, kind: PickerKind) -> CloseTicket {
        self.settle(endpoint, kind);
        let generation = self.endpoint(endpoint).map_or(0, |state| state.opened);
        CloseTicket { endpoint, generation }
    }
}
