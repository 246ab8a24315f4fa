use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::AppResult;
use crate::layers::{TemporalLayer, WmsLayer, hour_parameter};
use crate::playback::{PlaybackController, PlaybackState};
use crate::system::shutdown::ShutdownSender;
use crate::time::{SpeedSetting, TimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeadlessOptions {
    pub autoplay: bool,
    /// Stop after this many change records.
    pub ticks: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RecordKind {
    Ready,
    Change,
    Stopped,
}

#[derive(Debug, Serialize)]
struct LayerRecord<'rec> {
    name: &'rec str,
    #[serde(rename = "TIME", skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// One JSON line of the headless change stream.
#[derive(Debug, Serialize)]
struct Record<'rec> {
    event: RecordKind,
    time: TimeValue,
    running: bool,
    speed: SpeedSetting,
    start: TimeValue,
    end: TimeValue,
    layers: Vec<LayerRecord<'rec>>,
}

impl<'rec> Record<'rec> {
    /// Ready/stopped records read the layers as they are, request URL
    /// included.
    fn snapshot(event: RecordKind, state: &PlaybackState, layers: &'rec [Arc<WmsLayer>]) -> Self {
        Self {
            event,
            time: state.value,
            running: state.running,
            speed: state.speed,
            start: state.start_date,
            end: state.end_date,
            layers: layers
                .iter()
                .map(|layer| LayerRecord {
                    name: layer.name(),
                    time: layer.time_parameter(),
                    url: Some(layer.request_url().to_string()),
                })
                .collect(),
        }
    }

    /// Change records derive `TIME` from the committed value, since the
    /// layers may already have moved on when the line is written.
    fn change(value: TimeValue, state: &PlaybackState, layers: &'rec [Arc<WmsLayer>]) -> Self {
        Self {
            event: RecordKind::Change,
            time: value,
            running: state.running,
            speed: state.speed,
            start: state.start_date,
            end: state.end_date,
            layers: layers
                .iter()
                .map(|layer| LayerRecord {
                    name: layer.name(),
                    time: layer
                        .kind()
                        .is_temporal()
                        .then(|| hour_parameter(value, layer.time_format())),
                    url: None,
                })
                .collect(),
        }
    }
}

fn write_record<W: Write>(out: &mut W, record: &Record<'_>) -> AppResult<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

struct ChangeStream<'out, W: Write> {
    out: &'out mut W,
    written: u64,
    limit: Option<u64>,
}

impl<W: Write> ChangeStream<'_, W> {
    /// Returns `true` once the tick limit is reached.
    fn write(
        &mut self,
        value: TimeValue,
        controller: &PlaybackController,
        layers: &[Arc<WmsLayer>],
    ) -> AppResult<bool> {
        let state = controller.snapshot();
        write_record(self.out, &Record::change(value, &state, layers))?;
        self.written = self.written.saturating_add(1);
        Ok(self.limit.is_some_and(|limit| self.written >= limit))
    }
}

/// Prints a `ready` line, every committed change while autoplay runs, and
/// a final `stopped` line. Returns the number of change lines written.
///
/// # Errors
///
/// Returns an error when a record cannot be serialized or written.
pub(crate) async fn run_headless<W: Write>(
    controller: &PlaybackController,
    layers: &[Arc<WmsLayer>],
    mut changes: mpsc::UnboundedReceiver<TimeValue>,
    options: HeadlessOptions,
    shutdown_tx: &ShutdownSender,
    out: &mut W,
) -> AppResult<u64> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut updates = controller.subscribe();
    write_record(
        out,
        &Record::snapshot(RecordKind::Ready, &controller.snapshot(), layers),
    )?;

    if options.autoplay {
        controller.start();
    }
    let mut stream = ChangeStream {
        out: &mut *out,
        written: 0,
        limit: options.ticks,
    };
    if !controller.is_running() {
        info!("Autoplay is off; nothing to stream");
    }

    while controller.is_running() {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            received = changes.recv() => {
                let Some(value) = received else {
                    break;
                };
                if stream.write(value, controller, layers)? {
                    info!(ticks = stream.written, "Tick limit reached");
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    controller.stop();
    while let Ok(value) = changes.try_recv() {
        if stream.limit.is_some_and(|limit| stream.written >= limit) {
            break;
        }
        stream.write(value, controller, layers)?;
    }
    let written = stream.written;
    write_record(
        out,
        &Record::snapshot(RecordKind::Stopped, &controller.snapshot(), layers),
    )?;
    info!(changes = written, "Headless run finished");
    Ok(written)
}
