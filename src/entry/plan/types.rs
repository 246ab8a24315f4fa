use std::sync::Arc;

use crate::layers::WmsLayer;
use crate::playback::PlaybackState;
use crate::ui::PanelSettings;

/// Controller inputs resolved from CLI and config.
#[derive(Debug)]
pub(crate) struct SliderSettings {
    pub initial: PlaybackState,
    pub autoplay: bool,
    pub layers: Vec<Arc<WmsLayer>>,
}

#[derive(Debug)]
pub(crate) enum RunPlan {
    Panel {
        settings: SliderSettings,
        panel: PanelSettings,
    },
    Headless {
        settings: SliderSettings,
        ticks: Option<u64>,
    },
}
