use serde::Serialize;

use crate::time::{CalendarUnit, SpeedSetting, TimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackStatus {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub value: TimeValue,
    pub start_date: TimeValue,
    pub end_date: TimeValue,
    pub speed: SpeedSetting,
    pub running: bool,
}

impl PlaybackState {
    /// Mount defaults: `now` inside a one-day window on each side, stopped,
    /// at `1x`.
    #[must_use]
    pub fn around(now: TimeValue) -> Self {
        Self {
            value: now,
            start_date: now.checked_sub_unit(CalendarUnit::Days).unwrap_or(now),
            end_date: now.checked_add_unit(CalendarUnit::Days).unwrap_or(now),
            speed: SpeedSetting::default(),
            running: false,
        }
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        if self.running {
            PlaybackStatus::Running
        } else {
            PlaybackStatus::Stopped
        }
    }

    /// Autoplay refuses to step once the value sits at or past the end.
    #[must_use]
    pub fn reached_end(&self) -> bool {
        self.value >= self.end_date
    }

    #[must_use]
    pub fn has_ordered_range(&self) -> bool {
        self.start_date <= self.end_date
    }
}
