use url::Url;

use super::types::{LayerSpec, TimeRange};
use crate::error::{AppError, AppResult, ValidationError};
use crate::playback::parse_range;
use crate::time::{SpeedSetting, TimeFormat, TimeValue};

pub(crate) fn parse_time_value(s: &str) -> Result<TimeValue, ValidationError> {
    s.parse::<TimeValue>()
}

pub(crate) fn parse_speed(s: &str) -> Result<SpeedSetting, ValidationError> {
    s.parse::<SpeedSetting>()
}

pub(crate) fn parse_time_format(s: &str) -> Result<TimeFormat, ValidationError> {
    TimeFormat::parse(s)
}

pub(crate) fn parse_time_range(s: &str) -> Result<TimeRange, ValidationError> {
    let (start, end) = parse_range(s)?;
    Ok(TimeRange { start, end })
}

/// Parses `NAME=URL` into a `WMSTime` layer.
pub(crate) fn parse_layer(s: &str) -> Result<LayerSpec, ValidationError> {
    let Some((name, url)) = s.split_once('=') else {
        return Err(ValidationError::InvalidLayerFormat {
            value: s.to_owned(),
        });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidLayerFormat {
            value: s.to_owned(),
        });
    }
    let url = parse_layer_url(name, url)?;
    Ok(LayerSpec::wms_time(name.to_owned(), url))
}

pub(crate) fn parse_layer_url(name: &str, value: &str) -> Result<Url, ValidationError> {
    Url::parse(value.trim()).map_err(|err| ValidationError::InvalidLayerUrl {
        name: name.to_owned(),
        value: value.to_owned(),
        source: err,
    })
}

pub(crate) fn parse_ticks(s: &str) -> Result<u64, ValidationError> {
    match s.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) | Err(_) => Err(ValidationError::InvalidTicks {
            value: s.to_owned(),
        }),
    }
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" | "" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}
