use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::parsers::parse_layer;
use crate::args::{LayerSpec, SliderArgs};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult};
use crate::playback::parse_range;
use crate::time::{SpeedSetting, TimeFormat, TimeValue};

thread_local! {
    static BASE_MATCHES: ArgMatches = SliderArgs::command().get_matches_from(["timeslider"]);
}

/// Parses a speed (`0.5`, `300`, `days`).
///
/// # Errors
///
/// Returns an error when the speed is not a positive number or unit name.
pub fn parse_speed_input(input: &str) -> AppResult<SpeedSetting> {
    input.parse::<SpeedSetting>().map_err(AppError::from)
}

/// Parses an ISO-8601 instant.
///
/// # Errors
///
/// Returns an error when the instant is invalid.
pub fn parse_time_value_input(input: &str) -> AppResult<TimeValue> {
    input.parse::<TimeValue>().map_err(AppError::from)
}

/// Compiles a time format and renders `value` with it.
///
/// # Errors
///
/// Returns an error when the pattern is empty or has an open literal.
pub fn render_time_format_input(pattern: &str, value: TimeValue) -> AppResult<String> {
    let format = TimeFormat::parse(pattern)?;
    Ok(value.format(&format))
}

/// Parses an ISO-8601 `start/end` interval.
///
/// # Errors
///
/// Returns an error when either bound is missing or invalid, or the range
/// is inverted.
pub fn parse_range_input(input: &str) -> AppResult<(TimeValue, TimeValue)> {
    parse_range(input).map_err(AppError::from)
}

/// Parses a `NAME=URL` layer argument.
///
/// # Errors
///
/// Returns an error when the name or URL is invalid.
pub fn parse_layer_input(input: &str) -> AppResult<LayerSpec> {
    parse_layer(input).map_err(AppError::from)
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<SliderArgs> {
    let config: ConfigFile = toml::from_str(input)?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<SliderArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<SliderArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = SliderArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
