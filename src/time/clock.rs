use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use super::value::TimeValue;

/// Source of "now" for the controller's reset and default bounds.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeValue;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeValue {
        TimeValue::new(Utc::now())
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    seconds: AtomicI64,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: TimeValue) -> Self {
        Self {
            seconds: AtomicI64::new(now.timestamp()),
        }
    }

    pub fn set(&self, now: TimeValue) {
        self.seconds.store(now.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> TimeValue {
        TimeValue::from_timestamp(self.seconds.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
