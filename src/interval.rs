use chrono::TimeDelta;

use crate::{Instant, SelectionError};
use crate::config::{PickerConfig, StoredValues};
use crate::range::Bound;
use crate::resolve::{floor_to_half_hour, resolve_date, round_to_half_hour, saturating_add};
use crate::types::Endpoint;

/// Minimum gap between the start and end selections of an interval picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalConstraint {
    min_interval: TimeDelta,
}

impl IntervalConstraint {
    /// Negative gaps are treated as zero
    pub fn new(min_interval: TimeDelta) -> Self {
        Self {
            min_interval: min_interval.max(TimeDelta::zero()),
        }
    }

    pub const fn min_interval(&self) -> TimeDelta {
        self.min_interval
    }

    /// Whether `end` is at least the minimum gap after `start`
    pub fn is_satisfied(&self, start: Instant, end: Instant) -> bool {
        end - start >= self.min_interval
    }

    /// Earliest half-hour instant that satisfies the gap after `start`, `None`
    /// when it is not representable
    pub fn earliest_end(&self, start: Instant) -> Option<Instant> {
        start
            .checked_add_signed(self.min_interval)
            .map(round_to_half_hour)
            .filter(|end| self.is_satisfied(start, *end))
    }

    /// Latest half-hour instant that satisfies the gap before `end`, `None` when
    /// it is not representable
    pub fn latest_start(&self, end: Instant) -> Option<Instant> {
        end.checked_sub_signed(self.min_interval).map(floor_to_half_hour)
    }

    /// Restores the gap after `changed` was moved.
    ///
    /// The endpoint that was not touched gets pushed: the end moves forward to the
    /// earliest valid instant, or the start moves back to the latest one.
    ///
    /// # Errors
    /// Returns `SelectionError::IntervalOutOfBound` when the pushed endpoint would
    /// leave `bound`.
    pub fn repair(
        &self,
        changed: Endpoint,
        start: Instant,
        end: Instant,
        bound: &Bound,
    ) -> Result<(Instant, Instant), SelectionError> {
        if self.is_satisfied(start, end) {
            return Ok((start, end));
        }

        let other = changed.other();
        let (repaired, pushed) = match changed {
            Endpoint::Start => self.earliest_end(start).map(|end| ((start, end), end)),
            Endpoint::End => self.latest_start(end).map(|start| ((start, end), start)),
        }
        .filter(|(_, pushed)| bound.contains(*pushed))
        .ok_or(SelectionError::IntervalOutOfBound { endpoint: other })?;

        log::debug!("moved {other} to {pushed} to keep a gap of {}", self.min_interval);
        Ok(repaired)
    }

    /// Resolves the initial end selection of an interval picker.
    ///
    /// The default is the earliest valid end after `start`. A resolved end that
    /// violates the gap is reset to that default. `last_date` is extended when the
    /// end would otherwise fall outside the bound.
    pub fn resolve_end(
        &self,
        start: Instant,
        bound: &mut Bound,
        config: &PickerConfig,
        stored: &StoredValues,
    ) -> Instant {
        let default = self.earliest_end(start).unwrap_or_else(|| {
            log::warn!("minimum interval {} after {start} is out of range", self.min_interval);
            round_to_half_hour(saturating_add(start, self.min_interval))
        });
        let mut end = round_to_half_hour(resolve_date(
            default,
            config.end_date.as_ref(),
            stored.end_date.as_deref(),
        ));

        if !self.is_satisfied(start, end) {
            log::warn!("end date {end} is too close to start date {start}, resetting to {default}");
            end = default;
        }

        bound.extend_to(end);
        end
    }
}

impl Default for IntervalConstraint {
    fn default() -> Self {
        Self::new(PickerConfig::default().min_interval())
    }
}
