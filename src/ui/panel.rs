use std::time::Duration;

use crossterm::event::{Event, poll, read};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::playback::{
    PlaybackAction, PlaybackController, RangeSelector, ScrubDirection, apply_playback_action,
};
use crate::system::shutdown::{ShutdownSender, request_shutdown};
use crate::time::TimeFormat;

use super::input::{PanelAction, map_key};
use super::model::{SliderView, ViewContext};
use super::render::{Ui, UiActions};

/// Keyboard polling interval of the blocking reader thread.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Redraw cadence while nothing changes, so the future marker follows the
/// wall clock.
const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub date_format: TimeFormat,
    pub value_format: TimeFormat,
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFlow {
    Continue,
    Quit,
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Ui::cleanup();
    }
}

/// Applies one key action to the controller and the range picker. While the
/// picker is open, left/right move its cursor instead of the playback value.
pub fn apply_panel_action(
    controller: &PlaybackController,
    selector: &mut RangeSelector,
    action: PanelAction,
) -> PanelFlow {
    match action {
        PanelAction::Playback(PlaybackAction::ScrubBackward) if selector.is_open() => {
            selector.move_cursor(ScrubDirection::Backward, controller.snapshot().speed);
        }
        PanelAction::Playback(PlaybackAction::ScrubForward) if selector.is_open() => {
            selector.move_cursor(ScrubDirection::Forward, controller.snapshot().speed);
        }
        PanelAction::Playback(playback) => {
            if apply_playback_action(controller, playback) {
                debug!(?playback, "Playback action applied");
            }
        }
        PanelAction::OpenRangePicker => selector.open(&controller.snapshot()),
        PanelAction::MarkRangeStart => {
            if let Some(cursor) = selector.cursor() {
                selector.mark_start(cursor);
            }
        }
        PanelAction::MarkRangeEnd => {
            if let Some(cursor) = selector.cursor() {
                selector.mark_end(cursor);
            }
        }
        PanelAction::ConfirmRange => {
            if let Err(err) = selector.confirm(controller) {
                warn!("Range not applied: {}", err);
            }
        }
        PanelAction::Back => {
            if !selector.is_open() {
                return PanelFlow::Quit;
            }
            selector.cancel();
        }
        PanelAction::Quit => return PanelFlow::Quit,
    }
    PanelFlow::Continue
}

#[must_use]
pub fn slider_view(
    controller: &PlaybackController,
    selector: &RangeSelector,
    settings: &PanelSettings,
) -> SliderView {
    SliderView::new(
        &controller.snapshot(),
        selector.pending(),
        &ViewContext {
            now: controller.now(),
            date_format: &settings.date_format,
            value_format: &settings.value_format,
            layers: controller.layers(),
            no_color: settings.no_color,
        },
    )
}

/// Runs the interactive panel until the user quits or shutdown is
/// broadcast. Autoplay is stopped on the way out.
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up or the event reader
/// task fails.
pub async fn run_panel(
    controller: &PlaybackController,
    settings: &PanelSettings,
    shutdown_tx: &ShutdownSender,
) -> AppResult<()> {
    let mut terminal = Ui::setup_terminal()?;
    let _guard = TerminalGuard;

    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut updates = controller.subscribe();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let reader = spawn_event_reader(shutdown_tx, event_tx);
    let mut selector = RangeSelector::default();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        Ui::render(&mut terminal, &slider_view(controller, &selector, settings));
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    request_shutdown(shutdown_tx, "controller closed");
                    break;
                }
            }
            received = event_rx.recv() => {
                let Some(event) = received else {
                    request_shutdown(shutdown_tx, "keyboard closed");
                    break;
                };
                if let Event::Key(key) = event
                    && let Some(action) = map_key(&key)
                    && apply_panel_action(controller, &mut selector, action) == PanelFlow::Quit
                {
                    request_shutdown(shutdown_tx, "quit");
                    break;
                }
            }
            _ = redraw.tick() => {}
        }
    }

    controller.stop();
    reader.await?;
    info!("Panel closed");
    Ok(())
}

/// Forwards key presses and resizes; everything else is dropped.
fn spawn_event_reader(
    shutdown_tx: &ShutdownSender,
    event_tx: mpsc::UnboundedSender<Event>,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::task::spawn_blocking(move || {
        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(broadcast::error::TryRecvError::Closed) => break,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }

            let has_event = match poll(KEY_POLL_INTERVAL) {
                Ok(has_event) => has_event,
                Err(err) => {
                    warn!("Keyboard polling failed: {}", err);
                    break;
                }
            };
            if !has_event {
                continue;
            }
            match read() {
                Ok(event @ (Event::Key(_) | Event::Resize(_, _))) => {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Event::FocusGained | Event::FocusLost | Event::Mouse(_) | Event::Paste(_)) => {}
                Err(err) => {
                    warn!("Keyboard read failed: {}", err);
                    break;
                }
            }
        }
    })
}
