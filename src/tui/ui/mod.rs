mod events_panel;
mod footer;
mod header;
mod keyboard_panel;
mod layers_panel;
mod status_panel;

use ratatui::prelude::*;

use crate::tui::app::App;

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Compact header
            Constraint::Length(6),  // Engine status
            Constraint::Length(16), // Input and output keyboards
            Constraint::Min(6),     // Layers | recent events
            Constraint::Length(1),  // Footer
        ])
        .split(frame.area());

    header::render(frame, app, root[0]);
    status_panel::render(frame, app, root[1]);
    keyboard_panel::render(frame, app, root[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[3]);
    layers_panel::render(frame, app, bottom[0]);
    events_panel::render(frame, app, bottom[1]);

    footer::render(frame, app, root[4]);
}
