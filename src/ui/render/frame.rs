use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame, text},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::model::SliderView;

use super::slider::{marks_line, slider_track_line};
use super::theme::{
    ACCENT_AMBER_RGB, ACCENT_GREEN_RGB, ACCENT_RANGE_RGB, ACCENT_RED_RGB, ACCENT_SPEED_RGB,
    HELP_HEIGHT, LAYERS_MIN_HEIGHT, PANEL_TEXT_RGB, RANGE_HEIGHT, SLIDER_HEIGHT, SPEED_HEIGHT,
    STATUS_HEIGHT, UI_MARGIN, app_background_style, highlight_style, muted_style,
    panel_block_style, panel_border_style, panel_title_style, rgb, style_color,
};

const HELP_TEXT: &str =
    "space play/pause  +/- speed  ←/→ scrub  n now  r range  s/e mark  enter apply  esc back  q quit";

pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView) {
    let size = f.size();
    f.render_widget(
        Block::default().style(app_background_style(view.no_color)),
        size,
    );

    let range_height = if view.pending.is_some() {
        RANGE_HEIGHT
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(UI_MARGIN)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(SLIDER_HEIGHT),
            Constraint::Length(SPEED_HEIGHT),
            Constraint::Length(range_height),
            Constraint::Min(LAYERS_MIN_HEIGHT),
            Constraint::Length(HELP_HEIGHT),
        ])
        .split(size);

    let [status, slider, speed, range, layers, help] = chunks.as_ref() else {
        return;
    };

    render_status(f, view, *status);
    render_slider(f, view, *slider);
    render_speed(f, view, *speed);
    if view.pending.is_some() {
        render_range(f, view, *range);
    }
    render_layers(f, view, *layers);
    f.render_widget(
        Paragraph::new(Span::styled(HELP_TEXT, muted_style(view.no_color))),
        *help,
    );
}

fn panel(title: &'static str, no_color: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(panel_block_style(no_color))
        .border_style(panel_border_style(no_color))
        .title_style(panel_title_style(no_color))
}

fn render_status<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView, area: Rect) {
    let no_color = view.no_color;
    let (state_label, state_color) = if view.running {
        ("playing", ACCENT_GREEN_RGB)
    } else {
        ("paused", ACCENT_AMBER_RGB)
    };
    let mut value_line = vec![
        Span::from("Time: "),
        Span::styled(
            view.value_label.clone(),
            highlight_style(no_color, rgb(PANEL_TEXT_RGB)),
        ),
    ];
    if view.in_future {
        value_line.push(Span::styled(
            "  (future)",
            style_color(no_color, rgb(ACCENT_AMBER_RGB)),
        ));
    }
    let lines = vec![
        text::Line::from(value_line),
        text::Line::from(vec![
            Span::from("Status: "),
            Span::styled(state_label, style_color(no_color, rgb(state_color))),
            Span::from("  ["),
            Span::styled(
                view.toggle_label(),
                highlight_style(no_color, rgb(ACCENT_SPEED_RGB)),
            ),
            Span::from("]"),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(panel("Time", no_color)), area);
}

fn render_slider<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView, area: Rect) {
    let block = panel("Range", view.no_color);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let lines = vec![
        slider_track_line(view.position, inner.width, view.no_color),
        marks_line(&view.marks, inner.width, view.no_color),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_speed<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView, area: Rect) {
    let no_color = view.no_color;
    let mut spans = Vec::new();
    for (label, selected) in view.speed_options() {
        if selected {
            spans.push(Span::styled(
                format!("[{}]", label),
                highlight_style(no_color, rgb(ACCENT_SPEED_RGB)),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", label), muted_style(no_color)));
        }
    }
    f.render_widget(
        Paragraph::new(text::Line::from(spans)).block(panel("Speed", no_color)),
        area,
    );
}

fn render_range<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView, area: Rect) {
    let Some(pending) = view.pending.as_ref() else {
        return;
    };
    let no_color = view.no_color;
    let accent = style_color(no_color, rgb(ACCENT_RANGE_RGB));
    let mut spans = vec![
        Span::from("Cursor: "),
        Span::styled(
            pending.cursor.clone(),
            highlight_style(no_color, rgb(ACCENT_SPEED_RGB)),
        ),
        Span::from("  Start: "),
        Span::styled(pending.start.clone(), accent),
        Span::from("  End: "),
        Span::styled(pending.end.clone(), accent),
    ];
    if !pending.ordered {
        spans.push(Span::styled(
            "  start is after end",
            style_color(no_color, rgb(ACCENT_RED_RGB)),
        ));
    }
    f.render_widget(
        Paragraph::new(text::Line::from(spans)).block(panel("Select range", no_color)),
        area,
    );
}

fn render_layers<B: Backend>(f: &mut Frame<'_, B>, view: &SliderView, area: Rect) {
    let no_color = view.no_color;
    let lines: Vec<text::Line<'static>> = if view.layers.is_empty() {
        vec![text::Line::from(Span::styled(
            "No layers configured",
            muted_style(no_color),
        ))]
    } else {
        view.layers
            .iter()
            .map(|layer| {
                text::Line::from(vec![
                    Span::styled(layer.name.clone(), panel_title_style(no_color)),
                    Span::styled(format!(" ({})", layer.kind), muted_style(no_color)),
                    Span::from("  TIME="),
                    Span::styled(
                        layer.time.clone().unwrap_or_else(|| "-".to_owned()),
                        style_color(no_color, rgb(ACCENT_SPEED_RGB)),
                    ),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines).block(panel("Layers", no_color)), area);
}
