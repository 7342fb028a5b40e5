use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use chordkeys_core::{KeySet, LogicalKey};

use crate::tui::app::App;
use crate::tui::theme::theme;

use LogicalKey::*;

/// Rows drawn for each keyboard
const ROWS: &[&[LogicalKey]] = &[
    &[Escape, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12],
    &[Grave, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9, Num0, Minus, Equal, Backspace],
    &[Tab, Q, W, E, R, T, Y, U, I, O, P, LeftBracket, RightBracket, Backslash],
    &[CapsLock, A, S, D, F, G, H, J, K, L, Semicolon, Apostrophe, Enter],
    &[LeftShift, Z, X, C, V, B, N, M, Comma, Period, Slash, RightShift],
    &[LeftCtrl, LeftMeta, LeftAlt, Space, RightAlt, RightMeta, RightCtrl, Left, Down, Up, Right],
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let empty = KeySet::new();
    let (input, output) = match &app.snapshot {
        Some(snap) => (&snap.input_held, &snap.output_held),
        None => (&empty, &empty),
    };

    render_keyboard(frame, halves[0], "INPUT", input, false);
    render_keyboard(frame, halves[1], "OUTPUT", output, true);
}

fn render_keyboard(frame: &mut Frame, area: Rect, title: &str, held: &KeySet, output: bool) {
    let t = theme();

    let block = Block::default()
        .title(t.panel_title(title, false))
        .borders(Borders::ALL)
        .border_style(t.panel_border(false));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = ROWS
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|&key| {
                    [
                        Span::styled(format!("{:^3}", key.label()), t.key_chip(held.contains(&key), output)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    // Held keys that the grid does not draw (symbols, mouse, navigation block)
    let extra: Vec<String> = held
        .iter()
        .filter(|k| !ROWS.iter().any(|row| row.contains(*k)))
        .map(|k| k.label().to_string())
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("held: ", t.text_muted()),
        Span::styled(
            if held.is_empty() {
                "-".to_string()
            } else {
                format!("{} key(s)", held.len())
            },
            t.text_secondary(),
        ),
        Span::raw("  "),
        Span::styled(extra.join(" "), t.key_chip(true, output)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
