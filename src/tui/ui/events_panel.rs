use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::{App, Pane};
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let focused = app.focused_pane == Pane::Events;

    let block = Block::default()
        .title(t.panel_title("DEVICE EVENTS", focused))
        .borders(Borders::ALL)
        .border_style(t.panel_border(focused))
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Plain
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.events.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No output yet. Type to see events here.",
            t.text_muted(),
        ));
        frame.render_widget(empty, inner);
        return;
    }

    // Newest at the bottom
    let visible_height = inner.height as usize;
    let start = app.events.len().saturating_sub(visible_height);

    let lines: Vec<Line> = app.events[start..]
        .iter()
        .map(|event| {
            Line::from(vec![
                Span::styled(format!("{:<8}", event.command.to_string()), t.event_command(event.command)),
                Span::styled(event.key.to_string(), t.text_primary()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
