use std::future::Future;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tokio::sync::mpsc;

use super::headless::{HeadlessOptions, run_headless};
use super::plan::{RunPlan, build_plan, resolve_settings};
use crate::args::SliderArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::layers::{LayerKind, SharedLayer, TemporalLayer, WmsLayer};
use crate::playback::{PlaybackController, PlaybackState};
use crate::system::shutdown::{request_shutdown, shutdown_channel};
use crate::time::{CalendarUnit, FixedClock, SpeedSetting, TimeFormat, TimeValue};
use url::Url;

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn at(value: &str) -> AppResult<TimeValue> {
    value.parse::<TimeValue>().map_err(AppError::from)
}

fn args(cli: &[&str]) -> AppResult<SliderArgs> {
    SliderArgs::try_parse_from(cli.iter().copied()).map_err(AppError::from)
}

fn clock() -> AppResult<FixedClock> {
    Ok(FixedClock::new(at("2023-06-01T12:00:00Z")?))
}

struct Headless {
    controller: PlaybackController,
    layers: Vec<Arc<WmsLayer>>,
    changes: mpsc::UnboundedReceiver<TimeValue>,
}

fn headless(state: PlaybackState) -> AppResult<Headless> {
    let url = Url::parse("https://maps.example.org/wms?LAYERS=radar")
        .map_err(|err| AppError::validation(format!("url parse failed: {}", err)))?;
    let format = TimeFormat::parse("YYYY-MM-DDTHH:mm:ss[Z]").map_err(AppError::from)?;
    let layers = vec![Arc::new(WmsLayer::new(
        "radar",
        LayerKind::WmsTime,
        url,
        format,
    ))];
    let (change_tx, changes) = mpsc::unbounded_channel();
    let controller = PlaybackController::builder()
        .clock(Arc::new(clock()?))
        .layers(layers.iter().map(|layer| layer.clone() as SharedLayer))
        .initial_state(state)
        .on_change(move |value| drop(change_tx.send(value)))
        .build();
    Ok(Headless {
        controller,
        layers,
        changes,
    })
}

fn parse_lines(out: &[u8]) -> AppResult<Vec<Value>> {
    let text = std::str::from_utf8(out)
        .map_err(|err| AppError::validation(format!("output is not UTF-8: {}", err)))?;
    text.lines()
        .map(|line| serde_json::from_str::<Value>(line).map_err(AppError::from))
        .collect()
}

fn field<'val>(record: &'val Value, pointer: &str) -> Option<&'val str> {
    record.pointer(pointer).and_then(Value::as_str)
}

#[test]
fn settings_default_to_a_day_around_now() -> AppResult<()> {
    let settings = resolve_settings(&args(&["timeslider"])?, &clock()?)?;
    let expected = PlaybackState::around(at("2023-06-01T12:00:00Z")?);
    if settings.initial != expected || settings.autoplay || !settings.layers.is_empty() {
        return Err(AppError::validation(format!(
            "Unexpected settings {:?}",
            settings.initial
        )));
    }
    Ok(())
}

#[test]
fn settings_keep_value_outside_range() -> AppResult<()> {
    let settings = resolve_settings(
        &args(&[
            "timeslider",
            "--value",
            "2024-01-01",
            "--range",
            "2023-01-01/2023-01-02",
            "--layer",
            "radar=https://maps.example.org/wms",
        ])?,
        &clock()?,
    )?;
    if settings.initial.value != at("2024-01-01T00:00:00Z")? {
        return Err(AppError::validation("Value was clamped"));
    }
    let layer = settings
        .layers
        .first()
        .ok_or_else(|| AppError::validation("Missing layer"))?;
    if layer.time_format() != &TimeFormat::wire_default() {
        return Err(AppError::validation("Layer should inherit --time-format"));
    }
    Ok(())
}

#[test]
fn settings_reject_inverted_bounds() -> AppResult<()> {
    let result = resolve_settings(
        &args(&["timeslider", "--start", "2023-01-05", "--end", "2023-01-01"])?,
        &clock()?,
    );
    match result {
        Err(AppError::Validation(ValidationError::RangeStartAfterEnd { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected result {:?}",
            other.map(|settings| settings.initial)
        ))),
    }
}

#[test]
fn build_plan_picks_mode() -> AppResult<()> {
    let headless_plan = build_plan(args(&["timeslider", "--no-ui", "--ticks", "5"])?, &clock()?)?;
    if !matches!(headless_plan, RunPlan::Headless { ticks: Some(5), .. }) {
        return Err(AppError::validation("Expected headless plan"));
    }
    let panel_plan = build_plan(args(&["timeslider", "--no-color"])?, &clock()?)?;
    match panel_plan {
        RunPlan::Panel { panel, .. } if panel.no_color => Ok(()),
        RunPlan::Panel { .. } | RunPlan::Headless { .. } => {
            Err(AppError::validation("Expected panel plan without color"))
        }
    }
}

#[test]
fn headless_streams_ticks_until_limit() -> AppResult<()> {
    run_async_test(async {
        let run = headless(PlaybackState {
            value: at("2023-06-01T10:15:30Z")?,
            start_date: at("2023-06-01T00:00:00Z")?,
            end_date: at("2023-06-02T00:00:00Z")?,
            speed: SpeedSetting::Calendar(CalendarUnit::Hours),
            running: false,
        })?;
        let (shutdown_tx, _) = shutdown_channel();
        let mut out = Vec::new();
        let written = run_headless(
            &run.controller,
            &run.layers,
            run.changes,
            HeadlessOptions {
                autoplay: true,
                ticks: Some(2),
            },
            &shutdown_tx,
            &mut out,
        )
        .await?;

        let records = parse_lines(&out)?;
        let events: Vec<&str> = records
            .iter()
            .filter_map(|record| field(record, "/event"))
            .collect();
        if written != 2 || events != ["ready", "change", "change", "stopped"] {
            return Err(AppError::validation(format!("Unexpected events {:?}", events)));
        }
        let times: Vec<&str> = records
            .iter()
            .filter_map(|record| field(record, "/layers/0/TIME"))
            .collect();
        if times
            != [
                "2023-06-01T10:00:00Z",
                "2023-06-01T11:00:00Z",
                "2023-06-01T12:00:00Z",
                "2023-06-01T12:00:00Z",
            ]
        {
            return Err(AppError::validation(format!("Unexpected TIME values {:?}", times)));
        }
        let last = records
            .last()
            .ok_or_else(|| AppError::validation("Missing stopped record"))?;
        if field(last, "/time") != Some("2023-06-01T12:15:30Z")
            || last.pointer("/running") != Some(&Value::Bool(false))
            || field(last, "/speed") != Some("hours")
            || !field(last, "/layers/0/url").is_some_and(|url| url.contains("TIME="))
        {
            return Err(AppError::validation(format!("Unexpected stopped record {}", last)));
        }
        if run.controller.is_running() {
            return Err(AppError::validation("Autoplay left running"));
        }
        Ok(())
    })
}

#[test]
fn headless_stops_at_range_end() -> AppResult<()> {
    run_async_test(async {
        let run = headless(PlaybackState {
            value: at("2023-01-01T23:59:00Z")?,
            start_date: at("2023-01-01T00:00:00Z")?,
            end_date: at("2023-01-02T00:00:00Z")?,
            speed: SpeedSetting::Numeric(std::time::Duration::from_secs(3600)),
            running: false,
        })?;
        let (shutdown_tx, _) = shutdown_channel();
        let mut out = Vec::new();
        let written = run_headless(
            &run.controller,
            &run.layers,
            run.changes,
            HeadlessOptions {
                autoplay: true,
                ticks: None,
            },
            &shutdown_tx,
            &mut out,
        )
        .await?;
        let records = parse_lines(&out)?;
        let last = records
            .last()
            .ok_or_else(|| AppError::validation("Missing stopped record"))?;
        if written != 1 || records.len() != 3 || field(last, "/time") != Some("2023-01-02T00:59:00Z")
        {
            return Err(AppError::validation(format!(
                "Unexpected run: {} changes, {} records",
                written,
                records.len()
            )));
        }
        Ok(())
    })
}

#[test]
fn headless_without_autoplay_reports_and_exits() -> AppResult<()> {
    run_async_test(async {
        let run = headless(PlaybackState::around(at("2023-06-01T12:00:00Z")?))?;
        let (shutdown_tx, _) = shutdown_channel();
        let mut out = Vec::new();
        let written = run_headless(
            &run.controller,
            &run.layers,
            run.changes,
            HeadlessOptions {
                autoplay: false,
                ticks: None,
            },
            &shutdown_tx,
            &mut out,
        )
        .await?;
        let records = parse_lines(&out)?;
        if written != 0 || records.len() != 2 {
            return Err(AppError::validation("Expected ready and stopped only"));
        }
        Ok(())
    })
}

#[test]
fn headless_honors_shutdown() -> AppResult<()> {
    run_async_test(async {
        let run = headless(PlaybackState::around(at("2023-06-01T12:00:00Z")?))?;
        let (shutdown_tx, _) = shutdown_channel();
        let trigger = shutdown_tx.clone();
        let stopper = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(3500)).await;
            request_shutdown(&trigger, "test");
        });
        let mut out = Vec::new();
        let written = run_headless(
            &run.controller,
            &run.layers,
            run.changes,
            HeadlessOptions {
                autoplay: true,
                ticks: None,
            },
            &shutdown_tx,
            &mut out,
        )
        .await?;
        stopper.await?;
        if written != 3 {
            return Err(AppError::validation(format!("Expected 3 changes, got {}", written)));
        }
        Ok(())
    })
}
