use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::{
    parse_layer_url, parse_speed, parse_time_format, parse_time_range, parse_time_value,
};
use crate::args::{LayerSpec, SliderArgs};
use crate::error::{ConfigError, ValidationError};
use crate::layers::LayerKind;

use super::types::{ConfigFile, LayerConfig};

/// Applies configuration values to CLI arguments. Anything given on the
/// command line is left alone.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each
/// other.
pub fn apply_config(
    args: &mut SliderArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if config.range.is_some() && (config.start.is_some() || config.end.is_some()) {
        return Err(ConfigError::Conflict {
            left: "range",
            right: "start/end",
        });
    }

    if !is_cli(matches, "value")
        && let Some(value) = config.value.as_deref()
    {
        args.value = Some(parse_time_value(value).map_err(field("value"))?);
    }

    apply_bounds(args, matches, config)?;

    if !is_cli(matches, "speed")
        && let Some(speed) = config.speed.as_ref()
    {
        args.speed = parse_speed(&speed.to_text()).map_err(field("speed"))?;
    }

    if !is_cli(matches, "date_format")
        && let Some(format) = config.date_format.as_deref()
    {
        args.date_format = parse_time_format(format).map_err(field("date_format"))?;
    }

    if !is_cli(matches, "time_format")
        && let Some(format) = config.time_format.as_deref()
    {
        args.time_format = parse_time_format(format).map_err(field("time_format"))?;
    }

    if !is_cli(matches, "play")
        && let Some(autoplay) = config.autoplay
    {
        args.play = autoplay;
    }

    if !is_cli(matches, "no_ui")
        && let Some(no_ui) = config.no_ui
    {
        args.no_ui = no_ui;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "ticks")
        && let Some(ticks) = config.ticks
    {
        if ticks == 0 {
            return Err(ConfigError::TicksMustBePositive);
        }
        args.ticks = Some(ticks);
    }

    if !is_cli(matches, "layers")
        && let Some(layers) = config.layers.as_ref()
    {
        let mut parsed = Vec::with_capacity(layers.len());
        for (index, layer) in layers.iter().enumerate() {
            parsed.push(
                layer_from_config(layer)
                    .map_err(|source| ConfigError::InvalidLayer { index, source })?,
            );
        }
        args.layers = parsed;
    }

    Ok(())
}

/// A config `range` stands in for both `start` and `end`. A bound given on
/// the command line, directly or through `--range`, wins.
fn apply_bounds(
    args: &mut SliderArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if is_cli(matches, "range") {
        return Ok(());
    }
    let (start, end) = match config.range.as_deref() {
        Some(range) => {
            let range = parse_time_range(range).map_err(field("range"))?;
            (Some(range.start), Some(range.end))
        }
        None => (
            config
                .start
                .as_deref()
                .map(parse_time_value)
                .transpose()
                .map_err(field("start"))?,
            config
                .end
                .as_deref()
                .map(parse_time_value)
                .transpose()
                .map_err(field("end"))?,
        ),
    };
    if !is_cli(matches, "start") && start.is_some() {
        args.start = start;
    }
    if !is_cli(matches, "end") && end.is_some() {
        args.end = end;
    }
    Ok(())
}

pub(crate) fn layer_from_config(layer: &LayerConfig) -> Result<LayerSpec, ValidationError> {
    let name = layer.name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidLayerFormat {
            value: layer.name.clone(),
        });
    }
    let kind = match layer.kind.as_deref() {
        Some(kind) => kind.parse::<LayerKind>()?,
        None => LayerKind::WmsTime,
    };
    let time_format = layer
        .time_format
        .as_deref()
        .map(parse_time_format)
        .transpose()?;
    Ok(LayerSpec {
        name: name.to_owned(),
        kind,
        url: parse_layer_url(name, &layer.url)?,
        time_format,
        params: layer.params.clone(),
    })
}

fn field(name: &'static str) -> impl Fn(ValidationError) -> ConfigError {
    move |source| ConfigError::InvalidField {
        field: name,
        source,
    }
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
