use super::controller::{PlaybackController, ScrubDirection};

/// User-facing playback commands shared by the terminal panel and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    TogglePlayPause,
    SpeedUp,
    SpeedDown,
    ResetToNow,
    ScrubBackward,
    ScrubForward,
}

/// Applies `action` and reports whether the visible state changed.
pub fn apply_playback_action(controller: &PlaybackController, action: PlaybackAction) -> bool {
    let previous = controller.snapshot();
    match action {
        PlaybackAction::TogglePlayPause => controller.toggle(),
        PlaybackAction::SpeedUp => controller.set_speed(previous.speed.next_option()),
        PlaybackAction::SpeedDown => controller.set_speed(previous.speed.previous_option()),
        PlaybackAction::ResetToNow => controller.reset_to_now(),
        PlaybackAction::ScrubBackward => {
            controller.scrub(ScrubDirection::Backward);
        }
        PlaybackAction::ScrubForward => {
            controller.scrub(ScrubDirection::Forward);
        }
    }
    controller.snapshot() != previous
}
