use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Days, Months, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Calendar step used by symbolic speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl CalendarUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hours => "Hours",
            Self::Days => "Days",
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Years => "Years",
        }
    }

    /// Adds one unit. Months and years clamp to the last day of the target
    /// month when the source day does not exist there.
    #[must_use]
    pub fn add_to(self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Hours => instant.checked_add_signed(TimeDelta::hours(1)),
            Self::Days => instant.checked_add_days(Days::new(1)),
            Self::Weeks => instant.checked_add_days(Days::new(7)),
            Self::Months => instant.checked_add_months(Months::new(1)),
            Self::Years => instant.checked_add_months(Months::new(12)),
        }
    }

    #[must_use]
    pub fn subtract_from(self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Hours => instant.checked_sub_signed(TimeDelta::hours(1)),
            Self::Days => instant.checked_sub_days(Days::new(1)),
            Self::Weeks => instant.checked_sub_days(Days::new(7)),
            Self::Months => instant.checked_sub_months(Months::new(1)),
            Self::Years => instant.checked_sub_months(Months::new(12)),
        }
    }
}

impl FromStr for CalendarUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hours" => Ok(Self::Hours),
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            "month" | "months" => Ok(Self::Months),
            "year" | "years" => Ok(Self::Years),
            _ => Err(ValidationError::InvalidSpeed {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Autoplay step per tick: a number of seconds or one calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedSetting {
    Numeric(Duration),
    Calendar(CalendarUnit),
}

/// Options offered by the speed picker, in display order.
pub const SPEED_OPTIONS: [SpeedSetting; 12] = [
    SpeedSetting::Numeric(Duration::from_millis(500)),
    SpeedSetting::Numeric(Duration::from_secs(1)),
    SpeedSetting::Numeric(Duration::from_secs(2)),
    SpeedSetting::Numeric(Duration::from_secs(5)),
    SpeedSetting::Numeric(Duration::from_secs(10)),
    SpeedSetting::Numeric(Duration::from_secs(100)),
    SpeedSetting::Numeric(Duration::from_secs(300)),
    SpeedSetting::Calendar(CalendarUnit::Hours),
    SpeedSetting::Calendar(CalendarUnit::Days),
    SpeedSetting::Calendar(CalendarUnit::Weeks),
    SpeedSetting::Calendar(CalendarUnit::Months),
    SpeedSetting::Calendar(CalendarUnit::Years),
];

impl Default for SpeedSetting {
    fn default() -> Self {
        Self::Numeric(Duration::from_secs(1))
    }
}

impl SpeedSetting {
    /// Picker label, e.g. `0.5x` or `Days`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Numeric(step) => format!("{}x", format_seconds(step)),
            Self::Calendar(unit) => unit.label().to_owned(),
        }
    }

    #[must_use]
    pub fn option_index(self) -> Option<usize> {
        SPEED_OPTIONS.iter().position(|option| *option == self)
    }

    /// Next picker option; values outside the option set jump to the default.
    #[must_use]
    pub fn next_option(self) -> Self {
        self.option_index().map_or_else(Self::default, |index| {
            SPEED_OPTIONS
                .get(index.saturating_add(1))
                .copied()
                .unwrap_or(self)
        })
    }

    #[must_use]
    pub fn previous_option(self) -> Self {
        self.option_index().map_or_else(Self::default, |index| {
            index
                .checked_sub(1)
                .and_then(|previous| SPEED_OPTIONS.get(previous))
                .copied()
                .unwrap_or(self)
        })
    }
}

impl FromStr for SpeedSetting {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ValidationError::SpeedEmpty);
        }
        if let Ok(unit) = value.parse::<CalendarUnit>() {
            return Ok(Self::Calendar(unit));
        }

        let numeric = value.strip_suffix(['x', 'X']).unwrap_or(value);
        if let Some(negative) = numeric.strip_prefix('-') {
            return match parse_decimal_seconds(negative) {
                Some(_) => Err(ValidationError::SpeedNotPositive {
                    value: value.to_owned(),
                }),
                None => Err(ValidationError::InvalidSpeed {
                    value: value.to_owned(),
                }),
            };
        }
        let step = parse_decimal_seconds(numeric.strip_prefix('+').unwrap_or(numeric)).ok_or_else(
            || ValidationError::InvalidSpeed {
                value: value.to_owned(),
            },
        )?;
        if step.is_zero() {
            return Err(ValidationError::SpeedNotPositive {
                value: value.to_owned(),
            });
        }
        Ok(Self::Numeric(step))
    }
}

impl fmt::Display for SpeedSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(step) => f.write_str(&format_seconds(*step)),
            Self::Calendar(unit) => f.write_str(unit.as_str()),
        }
    }
}

/// Parses `12`, `0.5`, `.25` into a duration with millisecond precision.
fn parse_decimal_seconds(value: &str) -> Option<Duration> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }

    let seconds: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let millis_digits: String = fraction.chars().take(3).collect();
    let millis: u64 = format!("{:0<3}", millis_digits).parse().ok()?;
    Some(Duration::from_secs(seconds).saturating_add(Duration::from_millis(millis)))
}

fn format_seconds(step: Duration) -> String {
    let millis = step.subsec_millis();
    if millis == 0 {
        return step.as_secs().to_string();
    }
    let fraction = format!("{:03}", millis);
    format!("{}.{}", step.as_secs(), fraction.trim_end_matches('0'))
}

impl Serialize for SpeedSetting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
