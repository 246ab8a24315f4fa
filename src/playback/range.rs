use tracing::info;

use crate::error::{RangeBound, ValidationError};
use crate::time::{SpeedSetting, TimeValue};

use super::controller::{PlaybackController, ScrubDirection, manual_step};
use super::state::PlaybackState;

/// Bounds chosen in the picker but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRange {
    pub start: TimeValue,
    pub end: TimeValue,
    /// Picker position used for marks; independent of the playback value
    /// and free to leave the current range.
    pub cursor: TimeValue,
}

/// Holds the picker's pending selection and forwards confirmed bounds to
/// the controller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeSelector {
    pending: Option<PendingRange>,
}

impl RangeSelector {
    /// Opens the picker seeded with the current bounds, the cursor on the
    /// current value.
    pub const fn open(&mut self, state: &PlaybackState) {
        self.pending = Some(PendingRange {
            start: state.start_date,
            end: state.end_date,
            cursor: state.value,
        });
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<PendingRange> {
        self.pending
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<TimeValue> {
        match self.pending {
            Some(pending) => Some(pending.cursor),
            None => None,
        }
    }

    /// Steps the cursor by one `speed` step. Returns the new cursor, or
    /// `None` when the picker is closed or the step overflows.
    pub fn move_cursor(
        &mut self,
        direction: ScrubDirection,
        speed: SpeedSetting,
    ) -> Option<TimeValue> {
        let pending = self.pending.as_mut()?;
        pending.cursor = manual_step(pending.cursor, speed, direction)?;
        Some(pending.cursor)
    }

    /// Returns `false` when the picker is closed.
    pub const fn mark_start(&mut self, value: TimeValue) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.start = value;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when the picker is closed.
    pub const fn mark_end(&mut self, value: TimeValue) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.end = value;
                true
            }
            None => false,
        }
    }

    pub const fn cancel(&mut self) {
        self.pending = None;
    }

    /// Applies the pending bounds and closes the picker. An inverted pair
    /// is rejected and the picker stays open with the selection intact.
    ///
    /// # Errors
    ///
    /// Returns an error when the pending start is after the pending end.
    pub fn confirm(
        &mut self,
        controller: &PlaybackController,
    ) -> Result<Option<PendingRange>, ValidationError> {
        let Some(pending) = self.pending else {
            return Ok(None);
        };
        apply_range(controller, pending.start, pending.end)?;
        self.pending = None;
        Ok(Some(pending))
    }
}

/// # Errors
///
/// Returns an error when `start` is after `end`.
pub fn validate_range(start: TimeValue, end: TimeValue) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::RangeStartAfterEnd {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

fn apply_range(
    controller: &PlaybackController,
    start: TimeValue,
    end: TimeValue,
) -> Result<(), ValidationError> {
    validate_range(start, end)?;
    info!(%start, %end, "Range confirmed");
    controller.set_range(start, end);
    Ok(())
}

/// Parses an ISO-8601 interval `start/end`.
///
/// # Errors
///
/// Returns an error when either side is missing or invalid, or when the
/// start is after the end.
pub fn parse_range(value: &str) -> Result<(TimeValue, TimeValue), ValidationError> {
    let Some((start, end)) = value.split_once('/') else {
        return Err(ValidationError::InvalidRangeFormat {
            value: value.to_owned(),
        });
    };
    if start.trim().is_empty() {
        return Err(ValidationError::RangeBoundMissing {
            bound: RangeBound::Start,
        });
    }
    if end.trim().is_empty() {
        return Err(ValidationError::RangeBoundMissing {
            bound: RangeBound::End,
        });
    }
    let start = start.parse::<TimeValue>()?;
    let end = end.parse::<TimeValue>()?;
    validate_range(start, end)?;
    Ok((start, end))
}
