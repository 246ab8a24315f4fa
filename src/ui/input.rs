use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::playback::PlaybackAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Playback(PlaybackAction),
    OpenRangePicker,
    MarkRangeStart,
    MarkRangeEnd,
    ConfirmRange,
    /// Closes the range picker, or quits when it is not open.
    Back,
    Quit,
}

#[must_use]
pub fn map_key(event: &KeyEvent) -> Option<PanelAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(event.code, KeyCode::Char('c' | 'C')).then_some(PanelAction::Quit);
    }
    let action = match event.code {
        KeyCode::Char(' ') => PanelAction::Playback(PlaybackAction::TogglePlayPause),
        KeyCode::Char('+' | '=') | KeyCode::Up => PanelAction::Playback(PlaybackAction::SpeedUp),
        KeyCode::Char('-' | '_') | KeyCode::Down => {
            PanelAction::Playback(PlaybackAction::SpeedDown)
        }
        KeyCode::Char('n' | 'N') => PanelAction::Playback(PlaybackAction::ResetToNow),
        KeyCode::Left => PanelAction::Playback(PlaybackAction::ScrubBackward),
        KeyCode::Right => PanelAction::Playback(PlaybackAction::ScrubForward),
        KeyCode::Char('r' | 'R') => PanelAction::OpenRangePicker,
        KeyCode::Char('s' | 'S') => PanelAction::MarkRangeStart,
        KeyCode::Char('e' | 'E') => PanelAction::MarkRangeEnd,
        KeyCode::Enter => PanelAction::ConfirmRange,
        KeyCode::Esc => PanelAction::Back,
        KeyCode::Char('q' | 'Q') => PanelAction::Quit,
        KeyCode::Char(_)
        | KeyCode::Backspace
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => return None,
    };
    Some(action)
}
