use std::fmt;

use tracing::debug;

use crate::time::{TimeFormat, TimeValue};

use super::SharedLayer;

/// Value handed to the normalizer: a single instant or a `[start, end]`
/// pair, of which only the start is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSelection {
    Instant(TimeValue),
    Range(TimeValue, TimeValue),
}

impl TimeSelection {
    #[must_use]
    pub const fn reference(self) -> TimeValue {
        match self {
            Self::Instant(value) | Self::Range(value, _) => value,
        }
    }
}

impl From<TimeValue> for TimeSelection {
    fn from(value: TimeValue) -> Self {
        Self::Instant(value)
    }
}

impl From<(TimeValue, TimeValue)> for TimeSelection {
    fn from((start, end): (TimeValue, TimeValue)) -> Self {
        Self::Range(start, end)
    }
}

/// The backing WMS only answers hour-aligned timestamps.
#[must_use]
pub fn hour_parameter(value: TimeValue, format: &TimeFormat) -> String {
    value.floor_to_hour().format(format)
}

/// Pushes hour-aligned `TIME` parameters to every `WMSTime` layer.
#[derive(Clone, Default)]
pub struct WmsTimeParamNormalizer {
    layers: Vec<SharedLayer>,
}

impl WmsTimeParamNormalizer {
    /// Keeps only the layers of kind `WMSTime`.
    #[must_use]
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = SharedLayer>,
    {
        Self {
            layers: layers
                .into_iter()
                .filter(|layer| layer.kind().is_temporal())
                .collect(),
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[SharedLayer] {
        &self.layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sets `TIME` on every kept layer to the selection's instant floored to
    /// the hour. A range contributes its start.
    pub fn apply<S>(&self, selection: S)
    where
        S: Into<TimeSelection>,
    {
        let reference = selection.into().reference();
        for layer in &self.layers {
            let parameter = hour_parameter(reference, layer.time_format());
            debug!(layer = layer.name(), time = %parameter, "Updating TIME parameter");
            layer.set_time_parameter(&parameter);
        }
    }
}

impl fmt::Debug for WmsTimeParamNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| layer.name()))
            .finish()
    }
}
