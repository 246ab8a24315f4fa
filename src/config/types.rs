use std::collections::BTreeMap;

use serde::Deserialize;

/// On-disk settings; every field is optional and CLI flags win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub value: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub range: Option<String>,
    pub speed: Option<SpeedValue>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    #[serde(alias = "play")]
    pub autoplay: Option<bool>,
    pub no_ui: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
    pub ticks: Option<u64>,
    pub layers: Option<Vec<LayerConfig>>,
}

/// Speed may be written as a bare number (`speed = 300`) or text
/// (`speed = "days"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpeedValue {
    Seconds(f64),
    Text(String),
}

impl SpeedValue {
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Seconds(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    /// Defaults to `WMSTime`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: String,
    pub time_format: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}
