use ratatui::prelude::*;
use ratatui::widgets::*;

use chordkeys_core::Mode;

use crate::tui::app::{App, Pane};
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let focused = app.focused_pane == Pane::Status;

    let block = Block::default()
        .title(t.panel_title("ENGINE", focused))
        .borders(Borders::ALL)
        .border_style(t.panel_border(focused))
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Plain
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snap) = &app.snapshot else {
        let waiting = Paragraph::new(Line::styled("Waiting for the first tick...", t.text_muted()));
        frame.render_widget(waiting, inner);
        return;
    };

    let mode_label = match snap.mode {
        Mode::Idle => "IDLE".to_string(),
        Mode::Pending { .. } => "PENDING".to_string(),
        Mode::Engaged { layer: None } => "ENGAGED (no layer)".to_string(),
        Mode::Engaged { layer: Some(_) } => "ENGAGED".to_string(),
    };

    let layer = snap.layer.as_deref().unwrap_or("-");
    let activation = snap
        .activation_key
        .map(|k| k.to_string())
        .unwrap_or_else(|| "-".to_string());
    let separation = snap
        .last_combo_separation
        .map(|d| format!("{:.1} ms", d.as_secs_f64() * 1000.0))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Mode: ", t.text_muted()),
            Span::styled(format!(" {} ", mode_label), t.mode_badge(&snap.mode)),
            Span::raw("   "),
            Span::styled("Trigger: ", t.text_muted()),
            Span::styled(app.trigger.to_string(), t.text_primary()),
            Span::styled(format!(" ({})", app.activation), t.text_muted()),
        ]),
        Line::from(vec![
            Span::styled("Layer: ", t.text_muted()),
            Span::styled(layer.to_string(), t.text_primary().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled("Activation key: ", t.text_muted()),
            Span::styled(activation, t.text_primary()),
        ]),
        Line::from(vec![
            Span::styled("Last combo separation: ", t.text_muted()),
            Span::styled(separation, t.text_secondary()),
        ]),
        Line::from(vec![
            Span::styled("Tick: ", t.text_muted()),
            Span::styled(snap.tick.to_string(), t.text_secondary()),
            Span::raw("   "),
            Span::styled("Overruns: ", t.text_muted()),
            Span::styled(
                app.overruns.to_string(),
                if app.overruns > 0 {
                    t.status_message()
                } else {
                    t.text_secondary()
                },
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
