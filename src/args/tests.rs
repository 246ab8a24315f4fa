use super::parsers::{parse_bool_env, parse_layer, parse_ticks};
use super::test_support::parse_test_args;
use crate::error::{AppError, AppResult, ValidationError};
use crate::layers::LayerKind;
use crate::time::{CalendarUnit, SpeedSetting, TimeFormat, TimeValue};
use std::time::Duration;

fn at(value: &str) -> AppResult<TimeValue> {
    value.parse::<TimeValue>().map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["timeslider"])?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (args.value.is_none(), "Expected value to be None"),
        (args.bounds() == (None, None), "Expected no bounds"),
        (
            args.speed == SpeedSetting::Numeric(Duration::from_secs(1)),
            "Expected 1x speed",
        ),
        (!args.play, "Expected play to be false"),
        (args.layers.is_empty(), "Expected no layers"),
        (
            args.time_format == TimeFormat::wire_default(),
            "Unexpected time format",
        ),
        (
            args.date_format == TimeFormat::date_default(),
            "Unexpected date format",
        ),
        (!args.no_ui, "Expected no_ui to be false"),
        (args.ticks.is_none(), "Expected ticks to be None"),
        (!args.verbose, "Expected verbose to be false"),
        (args.config.is_none(), "Expected config to be None"),
        (args.no_color == expected_no_color, "Unexpected no_color"),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn parse_args_playback_options() -> AppResult<()> {
    let args = parse_test_args([
        "timeslider",
        "--value",
        "2023-06-01T10:15:30Z",
        "--start",
        "2023-06-01",
        "--end",
        "2023-06-02T00:00:00+02:00",
        "--speed",
        "Hours",
        "--play",
        "--no-ui",
        "--ticks",
        "3",
    ])?;

    let checks = [
        (args.value == Some(at("2023-06-01T10:15:30Z")?), "Unexpected value"),
        (
            args.bounds()
                == (
                    Some(at("2023-06-01T00:00:00Z")?),
                    Some(at("2023-06-01T22:00:00Z")?),
                ),
            "Unexpected bounds",
        ),
        (
            args.speed == SpeedSetting::Calendar(CalendarUnit::Hours),
            "Unexpected speed",
        ),
        (args.play, "Expected play"),
        (args.no_ui, "Expected no_ui"),
        (args.ticks == Some(3), "Unexpected ticks"),
    ];
    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }
    Ok(())
}

#[test]
fn parse_args_range_interval() -> AppResult<()> {
    let args = parse_test_args(["timeslider", "--range", "2023-01-01/2023-01-03"])?;
    if args.bounds() != (Some(at("2023-01-01T00:00:00Z")?), Some(at("2023-01-03T00:00:00Z")?)) {
        return Err(AppError::validation("Unexpected range bounds"));
    }
    Ok(())
}

#[test]
fn parse_args_range_conflicts_with_start() -> AppResult<()> {
    let result = parse_test_args([
        "timeslider",
        "--range",
        "2023-01-01/2023-01-03",
        "--start",
        "2023-01-02",
    ]);
    if result.is_ok() {
        return Err(AppError::validation("Expected --range/--start conflict"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_bad_values() -> AppResult<()> {
    let cases: [&[&str]; 5] = [
        &["timeslider", "--speed", "fortnights"],
        &["timeslider", "--speed", "0"],
        &["timeslider", "--value", "yesterday"],
        &["timeslider", "--range", "2023-01-03/2023-01-01"],
        &["timeslider", "--ticks", "0"],
    ];
    for case in cases {
        if parse_test_args(case.iter().copied()).is_ok() {
            return Err(AppError::validation(format!("Expected failure for {:?}", case)));
        }
    }
    Ok(())
}

#[test]
fn parse_args_repeated_layers() -> AppResult<()> {
    let args = parse_test_args([
        "timeslider",
        "--layer",
        "radar=https://maps.example.org/wms?LAYERS=radar",
        "--layer",
        "temperature=https://maps.example.org/wms",
        "--time-format",
        "YYYY-MM-DDTHH:mm:ss[Z]",
    ])?;
    let names: Vec<&str> = args.layers.iter().map(|layer| layer.name.as_str()).collect();
    if names != ["radar", "temperature"] {
        return Err(AppError::validation(format!("Unexpected layers {:?}", names)));
    }
    if args
        .layers
        .iter()
        .any(|layer| layer.kind != LayerKind::WmsTime || layer.time_format.is_some())
    {
        return Err(AppError::validation("CLI layers must be WMSTime without override"));
    }
    if args.time_format.pattern() != "YYYY-MM-DDTHH:mm:ss[Z]" {
        return Err(AppError::validation("Unexpected time format"));
    }
    Ok(())
}

#[test]
fn parse_layer_rejects_malformed_values() -> AppResult<()> {
    match parse_layer("radar") {
        Err(ValidationError::InvalidLayerFormat { .. }) => {}
        other => return Err(AppError::validation(format!("Unexpected {:?}", other))),
    }
    match parse_layer("=https://maps.example.org/wms") {
        Err(ValidationError::InvalidLayerFormat { .. }) => {}
        other => return Err(AppError::validation(format!("Unexpected {:?}", other))),
    }
    match parse_layer("radar=not a url") {
        Err(ValidationError::InvalidLayerUrl { name, .. }) if name == "radar" => Ok(()),
        other => Err(AppError::validation(format!("Unexpected {:?}", other))),
    }
}

#[test]
fn parse_ticks_requires_positive_integer() -> AppResult<()> {
    if parse_ticks("12").map_err(AppError::from)? != 12 {
        return Err(AppError::validation("Unexpected ticks"));
    }
    for value in ["0", "-1", "two", ""] {
        if parse_ticks(value).is_ok() {
            return Err(AppError::validation(format!("Expected failure for '{}'", value)));
        }
    }
    Ok(())
}

#[test]
fn parse_bool_env_accepts_common_spellings() -> AppResult<()> {
    for (value, expected) in [("1", true), ("Yes", true), ("off", false), ("", false)] {
        if parse_bool_env(value)? != expected {
            return Err(AppError::validation(format!("Unexpected bool for '{}'", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected failure for 'maybe'"));
    }
    Ok(())
}
