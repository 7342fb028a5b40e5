use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Pane};
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let mut spans = vec![
        Span::styled("Tab", t.key_hint()),
        Span::styled(":pane  ", t.text_muted()),
        Span::styled("1-3", t.key_hint()),
        Span::styled(":jump  ", t.text_muted()),
        Span::styled("p", t.key_hint()),
        Span::styled(":pause  ", t.text_muted()),
    ];

    // Context-sensitive hints for the focused pane
    match app.focused_pane {
        Pane::Status => {}
        Pane::Layers => {
            spans.push(Span::styled("Up/Down", t.key_hint()));
            spans.push(Span::styled(":browse layers  ", t.text_muted()));
        }
        Pane::Events => {
            spans.push(Span::styled("c", t.key_hint()));
            spans.push(Span::styled(":clear  ", t.text_muted()));
        }
    }

    spans.push(Span::styled("q", t.key_hint()));
    spans.push(Span::styled("/", t.text_muted()));
    spans.push(Span::styled("Ctrl-C", t.key_hint()));
    spans.push(Span::styled(":quit", t.text_muted()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
