use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let len = app.device_name.chars().count();
    let device = if len > 45 {
        let tail: String = app.device_name.chars().skip(len - 42).collect();
        format!("...{}", tail)
    } else {
        app.device_name.clone()
    };

    let mut spans = vec![
        // App name
        Span::styled("chordkeys ", t.text_primary().add_modifier(Modifier::BOLD)),
        // Grabbed device
        Span::styled(device, t.text_muted()),
        Span::raw(" "),
        Span::styled(format!("{} Hz", app.tick_rate_hz), t.text_secondary()),
        Span::raw(" "),
    ];
    if app.paused {
        spans.push(Span::styled("[PAUSED] ", t.status_message()));
    }
    spans.push(Span::styled("q:quit", t.key_hint()));

    let header = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(header, area);
}
