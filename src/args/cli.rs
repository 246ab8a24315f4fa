use clap::Parser;

use super::parsers::{
    parse_bool_env, parse_layer, parse_speed, parse_ticks, parse_time_format, parse_time_range,
    parse_time_value,
};
use super::types::{LayerSpec, TimeRange};
use crate::time::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, SpeedSetting, TimeFormat, TimeValue};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Terminal time slider that drives the TIME parameter of WMS time layers, with autoplay at selectable speeds.",
    next_help_heading = "Advanced Options"
)]
pub struct SliderArgs {
    /// Initial slider value (ISO-8601). Defaults to now.
    #[arg(long, value_parser = parse_time_value, help_heading = "Playback")]
    pub value: Option<TimeValue>,

    /// Start of the playback range (ISO-8601). Defaults to one day before now.
    #[arg(long, value_parser = parse_time_value, help_heading = "Playback")]
    pub start: Option<TimeValue>,

    /// End of the playback range (ISO-8601). Defaults to one day after now.
    #[arg(long, value_parser = parse_time_value, help_heading = "Playback")]
    pub end: Option<TimeValue>,

    /// Playback range as an ISO-8601 interval, e.g. 2023-01-01/2023-01-02
    #[arg(
        long,
        value_parser = parse_time_range,
        conflicts_with_all = ["start", "end"],
        help_heading = "Playback"
    )]
    pub range: Option<TimeRange>,

    /// Autoplay step per tick: seconds (0.5, 1, 300, ...) or hours, days, weeks, months, years
    #[arg(long, default_value = "1", value_parser = parse_speed, help_heading = "Playback")]
    pub speed: SpeedSetting,

    /// Start autoplay immediately
    #[arg(long, alias = "autoplay", help_heading = "Playback")]
    pub play: bool,

    /// WMS time layer as NAME=URL (repeatable)
    #[arg(long = "layer", value_parser = parse_layer, help_heading = "Layers")]
    pub layers: Vec<LayerSpec>,

    /// Default TIME parameter format for layers (moment-style tokens)
    #[arg(
        long = "time-format",
        default_value = DEFAULT_TIME_FORMAT,
        value_parser = parse_time_format,
        help_heading = "Layers"
    )]
    pub time_format: TimeFormat,

    /// Format of the slider's start, middle and end marks
    #[arg(
        long = "date-format",
        default_value = DEFAULT_DATE_FORMAT,
        value_parser = parse_time_format
    )]
    pub date_format: TimeFormat,

    /// Print every committed change as a JSON line instead of drawing the panel
    #[arg(long = "no-ui", alias = "headless")]
    pub no_ui: bool,

    /// Stop after this many autoplay ticks (headless mode)
    #[arg(long, value_parser = parse_ticks)]
    pub ticks: Option<u64>,

    /// Enable verbose logging (sets log level to debug unless overridden by TIMESLIDER_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug")]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./timeslider.toml or ./timeslider.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl SliderArgs {
    /// Bounds from `--range`, else from `--start`/`--end`.
    #[must_use]
    pub const fn bounds(&self) -> (Option<TimeValue>, Option<TimeValue>) {
        match self.range {
            Some(range) => (Some(range.start), Some(range.end)),
            None => (self.start, self.end),
        }
    }
}
