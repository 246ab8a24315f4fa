//! Core library for the `timeslider` CLI.
//!
//! A playback controller moves a time value across a range, either by hand
//! or on a one-second autoplay timer at a selectable speed, and pushes the
//! hour-floored value into the `TIME` parameter of every WMS time layer.
//! The binary wraps it in a terminal panel or a headless JSON stream.
pub mod args;
pub mod config;
pub mod error;
pub mod layers;
pub mod playback;
pub mod system;
pub mod time;
pub mod ui;

mod entry;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;

pub use entry::run;
