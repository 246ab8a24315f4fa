use super::types::{ConfigFile, SpeedValue};
use super::{apply_config, load_config_file};
use clap::{CommandFactory, FromArgMatches};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

use crate::args::SliderArgs;
use crate::error::{AppError, ConfigError, ValidationError};
use crate::layers::LayerKind;
use crate::time::{CalendarUnit, SpeedSetting, TimeValue};

fn write_config(path: &Path, content: &str) -> Result<ConfigFile, String> {
    std::fs::write(path, content).map_err(|err| format!("write failed: {}", err))?;
    load_config_file(path).map_err(|err| err.to_string())
}

fn parse_with_config(cli: &[&str], config: &ConfigFile) -> Result<SliderArgs, ConfigError> {
    let matches = SliderArgs::command()
        .try_get_matches_from(cli.iter().copied())
        .map_err(|err| ConfigError::from(err.to_string()))?;
    let mut args =
        SliderArgs::from_arg_matches(&matches).map_err(|err| ConfigError::from(err.to_string()))?;
    apply_config(&mut args, &matches, config)?;
    Ok(args)
}

fn at(value: &str) -> Result<TimeValue, String> {
    value
        .parse::<TimeValue>()
        .map_err(|err| format!("bad instant: {}", err))
}

#[test]
fn parse_toml_config_with_layers() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timeslider.toml");
    let config = write_config(
        &path,
        r#"
value = "2023-06-01T10:15:30Z"
start = "2023-06-01"
end = "2023-06-02"
speed = "hours"
autoplay = true

[[layers]]
name = "radar"
url = "https://maps.example.org/wms"
time_format = "YYYYMMDDHH"

[layers.params]
LAYERS = "radar"

[[layers]]
name = "basemap"
type = "Tile"
url = "https://tiles.example.org/{z}/{x}/{y}.png"
"#,
    )?;

    if config.value.as_deref() != Some("2023-06-01T10:15:30Z") {
        return Err("Unexpected value".to_owned());
    }
    if !matches!(config.speed, Some(SpeedValue::Text(ref speed)) if speed == "hours") {
        return Err(format!("Unexpected speed: {:?}", config.speed));
    }
    let layers = match config.layers {
        Some(layers) => layers,
        None => return Err("Expected layers".to_owned()),
    };
    let first = match layers.first() {
        Some(layer) => layer,
        None => return Err("Missing layer".to_owned()),
    };
    if first.params.get("LAYERS").map(String::as_str) != Some("radar") {
        return Err("Unexpected layer params".to_owned());
    }
    let second = match layers.get(1) {
        Some(layer) => layer,
        None => return Err("Missing second layer".to_owned()),
    };
    if second.kind.as_deref() != Some("Tile") {
        return Err("Unexpected layer type".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config_with_numeric_speed() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timeslider.json");
    let config = write_config(
        &path,
        r#"{
  "range": "2023-01-01/2023-01-02",
  "speed": 0.5,
  "no_ui": true,
  "ticks": 4,
  "layers": [
    { "name": "radar", "url": "https://maps.example.org/wms" }
  ]
}"#,
    )?;

    let args = parse_with_config(&["timeslider"], &config).map_err(|err| err.to_string())?;
    if args.speed != SpeedSetting::Numeric(Duration::from_millis(500)) {
        return Err(format!("Unexpected speed: {}", args.speed));
    }
    if (args.start, args.end) != (Some(at("2023-01-01")?), Some(at("2023-01-02")?)) {
        return Err("Unexpected bounds".to_owned());
    }
    if !args.no_ui || args.ticks != Some(4) {
        return Err("Unexpected headless settings".to_owned());
    }
    let layer = match args.layers.first() {
        Some(layer) => layer,
        None => return Err("Missing layer".to_owned()),
    };
    if layer.kind != LayerKind::WmsTime || layer.name != "radar" {
        return Err("Unexpected layer".to_owned());
    }
    Ok(())
}

#[test]
fn cli_values_override_config() -> Result<(), String> {
    let config = ConfigFile {
        speed: Some(SpeedValue::Text("days".to_owned())),
        start: Some("2023-01-01".to_owned()),
        end: Some("2023-01-10".to_owned()),
        autoplay: Some(true),
        ..ConfigFile::default()
    };
    let args = parse_with_config(
        &["timeslider", "--speed", "weeks", "--start", "2023-01-05"],
        &config,
    )
    .map_err(|err| err.to_string())?;

    if args.speed != SpeedSetting::Calendar(CalendarUnit::Weeks) {
        return Err("CLI speed should win".to_owned());
    }
    if args.start != Some(at("2023-01-05")?) || args.end != Some(at("2023-01-10")?) {
        return Err("Unexpected merged bounds".to_owned());
    }
    if !args.play {
        return Err("Config autoplay should apply".to_owned());
    }
    Ok(())
}

#[test]
fn cli_range_ignores_config_bounds() -> Result<(), String> {
    let config = ConfigFile {
        start: Some("2020-01-01".to_owned()),
        ..ConfigFile::default()
    };
    let args = parse_with_config(&["timeslider", "--range", "2023-01-01/2023-01-02"], &config)
        .map_err(|err| err.to_string())?;
    if args.start.is_some()
        || args.bounds() != (Some(at("2023-01-01")?), Some(at("2023-01-02")?))
    {
        return Err("Config start leaked past --range".to_owned());
    }
    Ok(())
}

#[test]
fn config_rejects_range_with_bounds() -> Result<(), String> {
    let config = ConfigFile {
        range: Some("2023-01-01/2023-01-02".to_owned()),
        end: Some("2023-01-03".to_owned()),
        ..ConfigFile::default()
    };
    match parse_with_config(&["timeslider"], &config) {
        Err(ConfigError::Conflict { left: "range", .. }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|args| args.speed))),
    }
}

#[test]
fn config_rejects_invalid_fields() -> Result<(), String> {
    let bad_speed = ConfigFile {
        speed: Some(SpeedValue::Text("fortnights".to_owned())),
        ..ConfigFile::default()
    };
    match parse_with_config(&["timeslider"], &bad_speed) {
        Err(ConfigError::InvalidField {
            field: "speed",
            source: ValidationError::InvalidSpeed { .. },
        }) => {}
        other => return Err(format!("Unexpected speed result: {:?}", other.is_ok())),
    }

    let zero_ticks = ConfigFile {
        ticks: Some(0),
        ..ConfigFile::default()
    };
    if !matches!(
        parse_with_config(&["timeslider"], &zero_ticks),
        Err(ConfigError::TicksMustBePositive)
    ) {
        return Err("Expected ticks rejection".to_owned());
    }
    Ok(())
}

#[test]
fn config_rejects_bad_layers_with_index() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timeslider.toml");
    let config = write_config(
        &path,
        r#"
[[layers]]
name = "radar"
url = "https://maps.example.org/wms"

[[layers]]
name = "clouds"
type = "hologram"
url = "https://maps.example.org/wms"
"#,
    )?;
    match parse_with_config(&["timeslider"], &config) {
        Err(ConfigError::InvalidLayer {
            index: 1,
            source: ValidationError::UnknownLayerKind { .. },
        }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.is_ok())),
    }
}

#[test]
fn load_config_rejects_unknown_extension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timeslider.yaml");
    std::fs::write(&path, "speed: 1").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.is_ok())),
    }
}

#[test]
fn load_config_reports_parse_errors() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("timeslider.toml");
    std::fs::write(&path, "speed = [").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.is_ok())),
    }
}
