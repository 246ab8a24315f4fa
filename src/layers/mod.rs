//! Temporal map layers and the hour-aligned `TIME` parameter projection.
mod kind;
mod normalizer;
mod wms;


use std::sync::Arc;

use crate::time::TimeFormat;

pub use kind::LayerKind;
pub use normalizer::{TimeSelection, WmsTimeParamNormalizer, hour_parameter};
pub use wms::{TIME_PARAM, WmsLayer};

/// A map layer owned by the host whose content depends on a time parameter.
///
/// The controller only holds shared references; implementors keep their
/// own interior mutability for the parameter update.
pub trait TemporalLayer: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> LayerKind;
    fn time_format(&self) -> &TimeFormat;
    /// Replaces the layer's `TIME` query parameter, keeping the others.
    fn set_time_parameter(&self, value: &str);
}

pub type SharedLayer = Arc<dyn TemporalLayer>;
