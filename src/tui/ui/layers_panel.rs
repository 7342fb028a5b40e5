use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::{App, Pane};
use crate::tui::theme::theme;

/// Mapping cells per row in the detail view
const MAPPINGS_PER_ROW: usize = 4;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let focused = app.focused_pane == Pane::Layers;

    let block = Block::default()
        .title(t.panel_title("LAYERS", focused))
        .borders(Borders::ALL)
        .border_style(t.panel_border(focused))
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Plain
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(10)])
        .split(inner);

    let engaged = app.snapshot.as_ref().and_then(|s| s.layer.as_deref());

    let names: Vec<Line> = app
        .layers
        .iter()
        .enumerate()
        .map(|(i, layer)| {
            let marker = if Some(layer.name.as_str()) == engaged { "* " } else { "  " };
            let style = if i == app.layer_index && focused {
                t.selection()
            } else if Some(layer.name.as_str()) == engaged {
                Style::default().fg(t.palette.accent_success).add_modifier(Modifier::BOLD)
            } else {
                t.text_secondary()
            };
            Line::styled(format!("{}{}", marker, layer.name), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(names), chunks[0]);

    let Some(layer) = app.selected_layer() else {
        let empty = Paragraph::new(Line::styled("No layers configured", t.text_muted()));
        frame.render_widget(empty, chunks[1]);
        return;
    };

    let secondaries: Vec<String> = layer.secondaries.iter().map(|k| k.to_string()).collect();
    let mut lines = vec![Line::from(vec![
        Span::styled("secondary: ", t.text_muted()),
        Span::styled(
            if secondaries.is_empty() {
                "-".to_string()
            } else {
                secondaries.join(", ")
            },
            t.key_hint(),
        ),
    ])];

    for chunk in layer.mappings.chunks(MAPPINGS_PER_ROW) {
        let spans: Vec<Span> = chunk
            .iter()
            .flat_map(|(input, output)| {
                [
                    Span::styled(format!("{:>3}", input.label()), t.text_primary()),
                    Span::styled(" > ", t.text_muted()),
                    Span::styled(format!("{:<5}", output.label()), t.text_secondary()),
                ]
            })
            .collect();
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
}
