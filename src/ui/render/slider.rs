use ratatui::prelude::text;
use ratatui::text::Span;

use crate::ui::model::{POSITION_SCALE, SliderMark};

use super::theme::{
    ACCENT_HANDLE_RGB, ACCENT_TRACK_RGB, PANEL_MUTED_RGB, highlight_style, rgb, style_color,
};

const HANDLE: &str = "●";
const FILLED: &str = "━";
const EMPTY: &str = "─";

/// Cell of the handle within a track `cells` wide.
pub(in crate::ui) fn handle_cell(position: u16, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    let scaled = usize::from(position.min(POSITION_SCALE))
        .saturating_mul(last)
        .checked_div(usize::from(POSITION_SCALE))
        .unwrap_or(0);
    scaled.min(last)
}

/// `[━━━━●─────]`; an empty or inverted range draws a bare track.
pub(super) fn slider_track_line(
    position: Option<u16>,
    width: u16,
    no_color: bool,
) -> text::Line<'static> {
    let cells = usize::from(width.saturating_sub(2)).max(1);
    let handle = position.map(|position| handle_cell(position, cells));
    let filled_style = style_color(no_color, rgb(ACCENT_TRACK_RGB));
    let empty_style = style_color(no_color, rgb(PANEL_MUTED_RGB));

    let mut spans = Vec::with_capacity(cells.saturating_add(2));
    spans.push(Span::raw("["));
    for idx in 0..cells {
        let span = match handle {
            Some(cell) if idx == cell => {
                Span::styled(HANDLE, highlight_style(no_color, rgb(ACCENT_HANDLE_RGB)))
            }
            Some(cell) if idx < cell => Span::styled(FILLED, filled_style),
            Some(_) | None => Span::styled(EMPTY, empty_style),
        };
        spans.push(span);
    }
    spans.push(Span::raw("]"));
    text::Line::from(spans)
}

/// Start label flush left, middle centered, end flush right. The middle
/// label is dropped when the row is too narrow to hold all three.
pub(super) fn marks_line(marks: &[SliderMark; 3], width: u16, no_color: bool) -> text::Line<'static> {
    let width = usize::from(width);
    let [start, middle, end] = marks;
    let start_len = start.label.chars().count();
    let middle_len = middle.label.chars().count();
    let end_len = end.label.chars().count();
    let style = style_color(no_color, rgb(PANEL_MUTED_RGB));

    let middle_at = width.saturating_sub(middle_len) / 2;
    let end_at = width.saturating_sub(end_len);
    let fits_middle = start_len < middle_at
        && middle_at.saturating_add(middle_len) < end_at;

    let mut spans = vec![Span::styled(start.label.clone(), style)];
    let mut cursor = start_len;
    if fits_middle {
        spans.push(Span::raw(" ".repeat(middle_at.saturating_sub(cursor))));
        spans.push(Span::styled(middle.label.clone(), style));
        cursor = middle_at.saturating_add(middle_len);
    }
    spans.push(Span::raw(" ".repeat(end_at.saturating_sub(cursor).max(1))));
    spans.push(Span::styled(end.label.clone(), style));
    text::Line::from(spans)
}
