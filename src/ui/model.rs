use crate::layers::{SharedLayer, hour_parameter};
use crate::playback::{PendingRange, PlaybackState};
use crate::time::{SPEED_OPTIONS, SpeedSetting, TimeFormat, TimeValue};

/// Slider position resolution; `POSITION_SCALE` is the right edge.
pub const POSITION_SCALE: u16 = 1000;

pub const TOGGLE_LABEL_RUNNING: &str = "Pause";
pub const TOGGLE_LABEL_STOPPED: &str = "Autoplay";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderMark {
    pub value: TimeValue,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerLine {
    pub name: String,
    pub kind: &'static str,
    /// `TIME` parameter the layer currently carries, or `None` for layers
    /// outside the normalizer.
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLabels {
    pub start: String,
    pub end: String,
    pub cursor: String,
    pub ordered: bool,
}

/// Everything the panel draws, derived from one state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderView {
    pub marks: [SliderMark; 3],
    /// Value position in `0..=POSITION_SCALE`; `None` when the range is
    /// empty or inverted.
    pub position: Option<u16>,
    pub value_label: String,
    pub in_future: bool,
    pub running: bool,
    pub speed: SpeedSetting,
    pub speed_label: String,
    pub pending: Option<PendingLabels>,
    pub layers: Vec<LayerLine>,
    pub no_color: bool,
}

pub struct ViewContext<'ctx> {
    pub now: TimeValue,
    pub date_format: &'ctx TimeFormat,
    pub value_format: &'ctx TimeFormat,
    pub layers: &'ctx [SharedLayer],
    pub no_color: bool,
}

impl SliderView {
    #[must_use]
    pub fn new(state: &PlaybackState, pending: Option<PendingRange>, ctx: &ViewContext<'_>) -> Self {
        let middle = state.start_date.midpoint(state.end_date);
        let mark = |value: TimeValue| SliderMark {
            value,
            label: value.format(ctx.date_format),
        };
        let layers = ctx
            .layers
            .iter()
            .map(|layer| LayerLine {
                name: layer.name().to_owned(),
                kind: layer.kind().as_str(),
                time: layer
                    .kind()
                    .is_temporal()
                    .then(|| hour_parameter(state.value, layer.time_format())),
            })
            .collect();

        Self {
            marks: [
                mark(state.start_date),
                mark(middle),
                mark(state.end_date),
            ],
            position: position(state),
            value_label: state.value.format(ctx.value_format),
            in_future: state.value > ctx.now,
            running: state.running,
            speed: state.speed,
            speed_label: state.speed.label(),
            pending: pending.map(|range| PendingLabels {
                start: range.start.format(ctx.value_format),
                end: range.end.format(ctx.value_format),
                cursor: range.cursor.format(ctx.value_format),
                ordered: range.start <= range.end,
            }),
            layers,
            no_color: ctx.no_color,
        }
    }

    #[must_use]
    pub const fn toggle_label(&self) -> &'static str {
        if self.running {
            TOGGLE_LABEL_RUNNING
        } else {
            TOGGLE_LABEL_STOPPED
        }
    }

    /// Labels of every selectable speed with the current one flagged.
    #[must_use]
    pub fn speed_options(&self) -> Vec<(String, bool)> {
        SPEED_OPTIONS
            .iter()
            .map(|option| (option.label(), *option == self.speed))
            .collect()
    }
}

/// Out-of-range values pin to the nearest edge like a slider handle.
fn position(state: &PlaybackState) -> Option<u16> {
    let start = i128::from(state.start_date.timestamp());
    let end = i128::from(state.end_date.timestamp());
    let value = i128::from(state.value.timestamp());
    let span = end.checked_sub(start).filter(|span| *span > 0)?;
    let offset = value.checked_sub(start)?.clamp(0, span);
    let scaled = offset
        .checked_mul(i128::from(POSITION_SCALE))?
        .checked_div(span)?;
    u16::try_from(scaled).ok()
}
