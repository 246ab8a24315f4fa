use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::layers::{LayerKind, WmsLayer};
use crate::time::{TimeFormat, TimeValue};

/// An inclusive playback window given as one `start/end` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: TimeValue,
    pub end: TimeValue,
}

/// A map layer declared on the command line or in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    pub url: Url,
    /// Falls back to the global `--time-format` when unset.
    pub time_format: Option<TimeFormat>,
    pub params: BTreeMap<String, String>,
}

impl LayerSpec {
    /// A `WMSTime` layer with no extra parameters.
    #[must_use]
    pub const fn wms_time(name: String, url: Url) -> Self {
        Self {
            name,
            kind: LayerKind::WmsTime,
            url,
            time_format: None,
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn into_layer(self, default_format: &TimeFormat) -> Arc<WmsLayer> {
        let format = self
            .time_format
            .unwrap_or_else(|| default_format.clone());
        Arc::new(WmsLayer::new(self.name, self.kind, self.url, format).with_params(self.params))
    }
}
