use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use timeslider::layers::{LayerKind, SharedLayer, WmsLayer};
use timeslider::playback::{PlaybackController, PlaybackState, RangeSelector, TICK_INTERVAL};
use timeslider::time::{CalendarUnit, FixedClock, SpeedSetting, TimeFormat, TimeValue};
use url::Url;

fn run_paused<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?
        .block_on(future)
}

fn at(value: &str) -> Result<TimeValue, String> {
    value.parse::<TimeValue>().map_err(|err| err.to_string())
}

fn layer(name: &str, kind: LayerKind, pattern: &str) -> Result<Arc<WmsLayer>, String> {
    let url = Url::parse("https://maps.example.org/wms?SERVICE=WMS&LAYERS=radar")
        .map_err(|err| err.to_string())?;
    let format = TimeFormat::parse(pattern).map_err(|err| err.to_string())?;
    Ok(Arc::new(WmsLayer::new(name, kind, url, format)))
}

#[test]
fn autoplay_walks_a_day_hour_by_hour() -> Result<(), String> {
    run_paused(async {
        let radar = layer("radar", LayerKind::WmsTime, "YYYY-MM-DDTHH:mm:ss[Z]")?;
        let basemap = layer("basemap", LayerKind::Wms, "YYYY-MM-DD")?;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let controller = PlaybackController::builder()
            .clock(Arc::new(FixedClock::new(at("2023-06-01T12:00:00Z")?)))
            .layers([radar.clone() as SharedLayer, basemap.clone() as SharedLayer])
            .initial_state(PlaybackState {
                value: at("2023-06-01T21:30:00Z")?,
                start_date: at("2023-06-01T00:00:00Z")?,
                end_date: at("2023-06-02T00:00:00Z")?,
                speed: SpeedSetting::Calendar(CalendarUnit::Hours),
                running: false,
            })
            .on_change(move |value| {
                sink.lock().unwrap_or_else(PoisonError::into_inner).push(value);
            })
            .build();

        controller.start();
        for _ in 0..5 {
            tokio::time::sleep(TICK_INTERVAL).await;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;

        let values: Vec<String> = seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ToString::to_string)
            .collect();
        if values
            != [
                "2023-06-01T22:30:00Z",
                "2023-06-01T23:30:00Z",
                "2023-06-02T00:30:00Z",
            ]
        {
            return Err(format!("Unexpected changes {:?}", values));
        }
        if controller.is_running() {
            return Err("Autoplay should stop past the range end".to_owned());
        }
        if radar.time_parameter().as_deref() != Some("2023-06-02T00:00:00Z") {
            return Err(format!("Unexpected radar TIME {:?}", radar.time_parameter()));
        }
        if basemap.time_parameter().is_some() {
            return Err("Static layers keep their URL".to_owned());
        }
        Ok(())
    })
}

#[test]
fn picked_range_feeds_the_controller() -> Result<(), String> {
    let controller = PlaybackController::builder()
        .clock(Arc::new(FixedClock::new(at("2023-06-01T12:00:00Z")?)))
        .initial_state(PlaybackState::around(at("2023-06-01T12:00:00Z")?))
        .build();
    let mut selector = RangeSelector::default();
    selector.open(&controller.snapshot());
    selector.mark_start(at("2023-05-30T00:00:00Z")?);
    selector.mark_end(at("2023-06-03T00:00:00Z")?);
    selector
        .confirm(&controller)
        .map_err(|err| err.to_string())?;

    let state = controller.snapshot();
    if state.start_date != at("2023-05-30T00:00:00Z")?
        || state.end_date != at("2023-06-03T00:00:00Z")?
        || state.value != at("2023-06-01T12:00:00Z")?
    {
        return Err(format!("Unexpected state {:?}", state));
    }
    Ok(())
}

#[test]
fn speed_cycle_covers_every_option() -> Result<(), String> {
    let controller = PlaybackController::builder()
        .clock(Arc::new(FixedClock::new(at("2023-06-01T12:00:00Z")?)))
        .build();
    let mut labels = vec![controller.snapshot().speed.label()];
    for _ in 0..6 {
        controller.set_speed(controller.snapshot().speed.next_option());
        labels.push(controller.snapshot().speed.label());
    }
    if labels.first() == labels.last() || labels.len() != 7 {
        return Err(format!("Unexpected labels {:?}", labels));
    }
    Ok(())
}
