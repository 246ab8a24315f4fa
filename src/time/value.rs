use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

use super::format::TimeFormat;
use super::speed::CalendarUnit;

/// Naive layouts accepted in addition to RFC 3339; interpreted as UTC.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_LAYOUT: &str = "%Y-%m-%d";
const DISPLAY_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A UTC instant with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeValue(DateTime<Utc>);

impl TimeValue {
    /// Wraps an instant, discarding its sub-second part.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(0))
    }

    #[must_use]
    pub fn from_timestamp(seconds: i64) -> Option<Self> {
        Utc.timestamp_opt(seconds, 0).single().map(Self)
    }

    #[must_use]
    pub fn timestamp(self) -> i64 {
        self.0.timestamp()
    }

    /// Zeroes minutes and seconds, keeping the hour.
    #[must_use]
    pub fn floor_to_hour(self) -> Self {
        self.0
            .with_minute(0)
            .and_then(|instant| instant.with_second(0))
            .map_or(self, Self)
    }

    #[must_use]
    pub fn checked_add_duration(self, duration: Duration) -> Option<Self> {
        let delta = TimeDelta::from_std(duration).ok()?;
        self.0.checked_add_signed(delta).map(Self::new)
    }

    #[must_use]
    pub fn checked_sub_duration(self, duration: Duration) -> Option<Self> {
        let delta = TimeDelta::from_std(duration).ok()?;
        self.0.checked_sub_signed(delta).map(Self::new)
    }

    #[must_use]
    pub fn checked_add_unit(self, unit: CalendarUnit) -> Option<Self> {
        unit.add_to(self.0).map(Self::new)
    }

    #[must_use]
    pub fn checked_sub_unit(self, unit: CalendarUnit) -> Option<Self> {
        unit.subtract_from(self.0).map(Self::new)
    }

    /// Instant halfway between `self` and `other`, rounded towards `self`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        let span = other.timestamp().saturating_sub(self.timestamp());
        let half = span.checked_div(2).unwrap_or(0);
        Self::from_timestamp(self.timestamp().saturating_add(half)).unwrap_or(self)
    }

    #[must_use]
    pub fn format(self, format: &TimeFormat) -> String {
        format.render(self.0)
    }
}

impl From<DateTime<Utc>> for TimeValue {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl FromStr for TimeValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ValidationError::TimeEmpty);
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::new(instant.with_timezone(&Utc)));
        }

        let naive = NAIVE_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, DATE_LAYOUT)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            });

        naive.map_or_else(
            || {
                Err(ValidationError::InvalidTime {
                    value: value.to_owned(),
                })
            },
            |naive| Ok(Self::new(Utc.from_utc_datetime(&naive))),
        )
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_LAYOUT))
    }
}

impl Serialize for TimeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
