use tracing::{info, warn};

use crate::args::SliderArgs;
use crate::error::{AppError, AppResult};
use crate::playback::{PlaybackState, validate_range};
use crate::time::{Clock, TimeFormat};
use crate::ui::PanelSettings;

use super::types::{RunPlan, SliderSettings};

pub(crate) fn build_plan(args: SliderArgs, clock: &dyn Clock) -> AppResult<RunPlan> {
    let settings = resolve_settings(&args, clock)?;
    if args.no_ui {
        return Ok(RunPlan::Headless {
            settings,
            ticks: args.ticks,
        });
    }
    if args.ticks.is_some() {
        warn!("--ticks only applies with --no-ui; ignoring");
    }
    Ok(RunPlan::Panel {
        settings,
        panel: PanelSettings {
            date_format: args.date_format,
            value_format: TimeFormat::value_display(),
            no_color: args.no_color,
        },
    })
}

/// Fills whatever the user left out with the mount defaults around `now`
/// and rejects an inverted range before anything starts.
pub(crate) fn resolve_settings(args: &SliderArgs, clock: &dyn Clock) -> AppResult<SliderSettings> {
    let now = clock.now();
    let defaults = PlaybackState::around(now);
    let (start, end) = args.bounds();
    let initial = PlaybackState {
        value: args.value.unwrap_or(now),
        start_date: start.unwrap_or(defaults.start_date),
        end_date: end.unwrap_or(defaults.end_date),
        speed: args.speed,
        running: false,
    };
    validate_range(initial.start_date, initial.end_date).map_err(AppError::from)?;
    if initial.value < initial.start_date || initial.value > initial.end_date {
        info!(
            value = %initial.value,
            start = %initial.start_date,
            end = %initial.end_date,
            "Initial value lies outside the playback range"
        );
    }

    let layers = args
        .layers
        .iter()
        .cloned()
        .map(|spec| spec.into_layer(&args.time_format))
        .collect();

    Ok(SliderSettings {
        initial,
        autoplay: args.play,
        layers,
    })
}
