//! Temporal playback: the autoplay controller, its state, and range picking.
mod action;
mod controller;
mod range;
mod state;


pub use action::{PlaybackAction, apply_playback_action};
pub use controller::{
    PlaybackController, PlaybackControllerBuilder, ScrubDirection, TICK_INTERVAL, TickOutcome,
};
pub use range::{PendingRange, RangeSelector, parse_range, validate_range};
pub use state::{PlaybackState, PlaybackStatus};
