use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::layers::{SharedLayer, WmsTimeParamNormalizer};
use crate::time::{Clock, SpeedSetting, SystemClock, TimeValue};

use super::state::PlaybackState;

/// Autoplay cadence. Speed changes the step taken per tick, never the cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
/// Smallest keyboard scrub step for sub-second numeric speeds.
const MIN_SCRUB_STEP: Duration = Duration::from_secs(1);

type ChangeCallback = Box<dyn Fn(TimeValue) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(TimeValue),
    /// The value was already at or past the end; autoplay stopped and the
    /// value is unchanged.
    ReachedEnd,
    /// The step would leave the representable date range; autoplay stopped.
    Overflow,
    /// Fired by a timer that has since been replaced or cancelled.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubDirection {
    Backward,
    Forward,
}

struct Playback {
    state: PlaybackState,
    /// Sub-second remainder of numeric steps, carried to the next tick.
    carry: Duration,
    /// Bumped whenever the timer is replaced or cancelled.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Committed values waiting for the `on_change` callback, in commit order.
#[derive(Default)]
struct Delivery {
    queue: VecDeque<TimeValue>,
    /// Set while one caller drains the queue; everyone else only enqueues.
    draining: bool,
}

struct Inner {
    playback: Mutex<Playback>,
    normalizer: WmsTimeParamNormalizer,
    clock: Arc<dyn Clock>,
    updates: watch::Sender<PlaybackState>,
    on_change: Option<ChangeCallback>,
    delivery: Mutex<Delivery>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.playback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, playback: &Playback) {
        self.updates.send_replace(playback.state);
    }

    /// Must run under the playback lock so the delivery queue keeps commit
    /// order.
    fn commit(&self, playback: &mut Playback, value: TimeValue) {
        playback.state.value = value;
        self.normalizer.apply(value);
        self.publish(playback);
        if self.on_change.is_some() {
            self.lock_delivery().queue.push_back(value);
        }
    }

    fn lock_delivery(&self) -> MutexGuard<'_, Delivery> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands queued values to the callback outside the playback lock. Only
    /// one caller drains at a time, so a callback that re-enters the
    /// controller just enqueues and the active drainer delivers it next.
    fn notify(&self) {
        let Some(callback) = self.on_change.as_ref() else {
            return;
        };
        {
            let mut delivery = self.lock_delivery();
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }
        loop {
            let next = {
                let mut delivery = self.lock_delivery();
                let next = delivery.queue.pop_front();
                if next.is_none() {
                    delivery.draining = false;
                }
                next
            };
            let Some(value) = next else {
                break;
            };
            callback(value);
        }
    }

    fn cancel_timer(playback: &mut Playback) {
        playback.generation = playback.generation.wrapping_add(1);
        if let Some(timer) = playback.timer.take() {
            timer.abort();
        }
    }

    fn halt(&self, playback: &mut Playback) {
        Self::cancel_timer(playback);
        playback.state.running = false;
        self.publish(playback);
    }

    fn tick(&self, generation: Option<u64>) -> TickOutcome {
        let value = {
            let mut playback = self.lock();
            if generation.is_some_and(|current| current != playback.generation) {
                return TickOutcome::Stale;
            }
            if playback.state.reached_end() {
                self.halt(&mut playback);
                info!(
                    value = %playback.state.value,
                    end = %playback.state.end_date,
                    "Autoplay reached the end of the range"
                );
                return TickOutcome::ReachedEnd;
            }
            let Some(next) = step_forward(&mut playback) else {
                self.halt(&mut playback);
                warn!(
                    value = %playback.state.value,
                    speed = %playback.state.speed,
                    "Autoplay step left the supported date range; stopping"
                );
                return TickOutcome::Overflow;
            };
            debug!(
                from = %playback.state.value,
                to = %next,
                speed = %playback.state.speed,
                "Autoplay tick"
            );
            self.commit(&mut playback, next);
            next
        };
        self.notify();
        TickOutcome::Advanced(value)
    }
}

/// One autoplay step. Numeric steps carry their sub-second remainder into
/// the next tick.
fn step_forward(playback: &mut Playback) -> Option<TimeValue> {
    let value = playback.state.value;
    match playback.state.speed {
        SpeedSetting::Numeric(step) => {
            let total = step.saturating_add(playback.carry);
            let whole = Duration::from_secs(total.as_secs());
            playback.carry = total.saturating_sub(whole);
            value.checked_add_duration(whole)
        }
        SpeedSetting::Calendar(unit) => value.checked_add_unit(unit),
    }
}

/// One keyboard step from `value`: the speed's calendar unit, or its
/// numeric step but at least one second. Not clamped to any range.
pub(super) fn manual_step(
    value: TimeValue,
    speed: SpeedSetting,
    direction: ScrubDirection,
) -> Option<TimeValue> {
    match (speed, direction) {
        (SpeedSetting::Numeric(step), ScrubDirection::Forward) => {
            value.checked_add_duration(step.max(MIN_SCRUB_STEP))
        }
        (SpeedSetting::Numeric(step), ScrubDirection::Backward) => {
            value.checked_sub_duration(step.max(MIN_SCRUB_STEP))
        }
        (SpeedSetting::Calendar(unit), ScrubDirection::Forward) => value.checked_add_unit(unit),
        (SpeedSetting::Calendar(unit), ScrubDirection::Backward) => value.checked_sub_unit(unit),
    }
}

/// Replaces any running timer with a fresh one. Returns `false` when no
/// tokio runtime is available to host it.
fn install_timer(inner: &Arc<Inner>, playback: &mut Playback) -> bool {
    Inner::cancel_timer(playback);
    let Ok(runtime) = Handle::try_current() else {
        warn!("Autoplay needs a tokio runtime; staying stopped");
        return false;
    };
    let generation = playback.generation;
    playback.timer = Some(runtime.spawn(run_timer(Arc::downgrade(inner), generation)));
    true
}

async fn run_timer(owner: Weak<Inner>, generation: u64) {
    let first = Instant::now()
        .checked_add(TICK_INTERVAL)
        .unwrap_or_else(Instant::now);
    let mut ticker = tokio::time::interval_at(first, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(inner) = owner.upgrade() else {
            break;
        };
        if !matches!(inner.tick(Some(generation)), TickOutcome::Advanced(_)) {
            break;
        }
    }
}

/// Owns the playback state and the autoplay timer.
///
/// Every committed value change is pushed through the normalizer to the
/// temporal layers, published to [`subscribe`](Self::subscribe) receivers,
/// and handed to the `on_change` callback. Callbacks run after the internal
/// lock is released, one at a time and in commit order; they should not block
/// and may call back into the controller. Dropping the controller cancels the
/// timer.
pub struct PlaybackController {
    inner: Arc<Inner>,
}

impl PlaybackController {
    #[must_use]
    pub fn builder() -> PlaybackControllerBuilder {
        PlaybackControllerBuilder::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaybackState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.inner.updates.subscribe()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.lock().state.running
    }

    #[must_use]
    pub fn layers(&self) -> &[SharedLayer] {
        self.inner.normalizer.layers()
    }

    #[must_use]
    pub fn now(&self) -> TimeValue {
        self.inner.clock.now()
    }

    /// Moves the value without any bounds check; manual scrubbing may leave
    /// the range.
    pub fn set_time(&self, value: TimeValue) {
        {
            let mut playback = self.inner.lock();
            playback.carry = Duration::ZERO;
            self.inner.commit(&mut playback, value);
        }
        debug!(%value, "Time set");
        self.inner.notify();
    }

    /// Replaces the bounds as given. Ordering is the caller's job (see
    /// [`RangeSelector`](super::RangeSelector)); with `start > end` autoplay
    /// stops as soon as the value is at or past `end`.
    pub fn set_range(&self, start: TimeValue, end: TimeValue) {
        let mut playback = self.inner.lock();
        playback.state.start_date = start;
        playback.state.end_date = end;
        if start > end {
            warn!(%start, %end, "Playback range is inverted");
        }
        info!(%start, %end, "Playback range updated");
        self.inner.publish(&playback);
    }

    /// Changes the step size. A running timer is replaced under the same
    /// lock, so no tick of the old timer lands after this returns.
    pub fn set_speed(&self, speed: SpeedSetting) {
        let mut playback = self.inner.lock();
        playback.state.speed = speed;
        playback.carry = Duration::ZERO;
        if playback.state.running && !install_timer(&self.inner, &mut playback) {
            playback.state.running = false;
        }
        info!(%speed, running = playback.state.running, "Playback speed updated");
        self.inner.publish(&playback);
    }

    /// Starts autoplay, restarting the timer when it is already running.
    pub fn start(&self) {
        let mut playback = self.inner.lock();
        self.start_locked(&mut playback);
    }

    pub fn stop(&self) {
        let mut playback = self.inner.lock();
        self.stop_locked(&mut playback);
    }

    pub fn toggle(&self) {
        let mut playback = self.inner.lock();
        if playback.state.running {
            self.stop_locked(&mut playback);
        } else {
            self.start_locked(&mut playback);
        }
    }

    fn start_locked(&self, playback: &mut Playback) {
        playback.state.running = install_timer(&self.inner, playback);
        if playback.state.running {
            info!(
                value = %playback.state.value,
                speed = %playback.state.speed,
                "Autoplay started"
            );
        }
        self.inner.publish(playback);
    }

    fn stop_locked(&self, playback: &mut Playback) {
        let was_running = playback.state.running;
        self.inner.halt(playback);
        if was_running {
            info!(value = %playback.state.value, "Autoplay stopped");
        }
    }

    /// Runs one autoplay step immediately, exactly as the timer would.
    pub fn tick(&self) -> TickOutcome {
        self.inner.tick(None)
    }

    pub fn reset_to_now(&self) {
        let now = self.inner.clock.now();
        self.set_time(now);
    }

    /// Keyboard scrub: stops autoplay and moves one speed step, clamped to
    /// the range like a slider handle.
    pub fn scrub(&self, direction: ScrubDirection) -> Option<TimeValue> {
        let value = {
            let mut playback = self.inner.lock();
            if playback.state.running {
                self.stop_locked(&mut playback);
            }
            let state = playback.state;
            let moved = manual_step(state.value, state.speed, direction)?;
            let clamped = if state.has_ordered_range() {
                moved.clamp(state.start_date, state.end_date)
            } else {
                moved
            };
            playback.carry = Duration::ZERO;
            self.inner.commit(&mut playback, clamped);
            clamped
        };
        self.inner.notify();
        Some(value)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        let mut playback = self.inner.lock();
        Inner::cancel_timer(&mut playback);
        playback.state.running = false;
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.snapshot())
            .field("layers", &self.inner.normalizer)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct PlaybackControllerBuilder {
    layers: Vec<SharedLayer>,
    clock: Option<Arc<dyn Clock>>,
    initial: Option<PlaybackState>,
    on_change: Option<ChangeCallback>,
}

impl PlaybackControllerBuilder {
    #[must_use]
    pub fn layers<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = SharedLayer>,
    {
        self.layers.extend(layers);
        self
    }

    #[must_use]
    pub fn layer(mut self, layer: SharedLayer) -> Self {
        self.layers.push(layer);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Initial value, bounds and speed. `running` is ignored; call
    /// [`PlaybackController::start`] once built.
    #[must_use]
    pub fn initial_state(mut self, state: PlaybackState) -> Self {
        self.initial = Some(state);
        self
    }

    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(TimeValue) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Builds the controller and pushes the initial value to the layers so
    /// they carry a `TIME` before anything is drawn.
    #[must_use]
    pub fn build(self) -> PlaybackController {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let mut state = self
            .initial
            .unwrap_or_else(|| PlaybackState::around(clock.now()));
        state.running = false;

        let normalizer = WmsTimeParamNormalizer::new(self.layers);
        normalizer.apply(state.value);
        debug!(
            layers = normalizer.len(),
            value = %state.value,
            "Playback controller ready"
        );

        let (updates, _) = watch::channel(state);
        PlaybackController {
            inner: Arc::new(Inner {
                playback: Mutex::new(Playback {
                    state,
                    carry: Duration::ZERO,
                    generation: 0,
                    timer: None,
                }),
                normalizer,
                clock,
                updates,
                on_change: self.on_change,
                delivery: Mutex::new(Delivery::default()),
            }),
        }
    }
}
