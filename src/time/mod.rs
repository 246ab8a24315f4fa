//! Instants, playback speeds, and display/wire formats.
mod clock;
mod format;
mod speed;
mod value;


pub use clock::{Clock, FixedClock, SystemClock};
pub use format::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, TimeFormat, VALUE_DISPLAY_FORMAT};
pub use speed::{CalendarUnit, SPEED_OPTIONS, SpeedSetting};
pub use value::TimeValue;
