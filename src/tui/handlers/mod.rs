use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Pane};

/// Handle input and return true if the monitor should quit
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Raw mode swallows SIGINT, so Ctrl-C arrives as a key
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // Global navigation: Tab cycles panes, 1/2/3 jump to specific pane
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => {
            app.cycle_pane_forward();
            return false;
        }
        KeyCode::BackTab => {
            app.cycle_pane_backward();
            return false;
        }
        KeyCode::Char('1') => {
            app.focused_pane = Pane::Status;
            return false;
        }
        KeyCode::Char('2') => {
            app.focused_pane = Pane::Layers;
            return false;
        }
        KeyCode::Char('3') => {
            app.focused_pane = Pane::Events;
            return false;
        }
        KeyCode::Char('p') => {
            app.toggle_pause();
            return false;
        }
        _ => {}
    }

    handle_pane_input(app, key.code);
    false
}

fn handle_pane_input(app: &mut App, key: KeyCode) {
    match app.focused_pane {
        Pane::Status => {}
        Pane::Layers => match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_layer(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_layer(),
            _ => {}
        },
        Pane::Events => {
            if key == KeyCode::Char('c') {
                app.clear_events();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordkeys_core::Config;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new("test", &Config::default());
        assert!(handle_input(&mut app, press(KeyCode::Char('q'))));
        assert!(handle_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!handle_input(&mut app, press(KeyCode::Char('c'))));
    }

    #[test]
    fn test_tab_cycles_panes() {
        let mut app = App::new("test", &Config::default());
        handle_input(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focused_pane, Pane::Layers);
        handle_input(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.focused_pane, Pane::Status);
    }

    #[test]
    fn test_layer_navigation_needs_focus() {
        let mut app = App::new("test", &Config::default());
        handle_input(&mut app, press(KeyCode::Down));
        assert_eq!(app.layer_index, 0);

        handle_input(&mut app, press(KeyCode::Char('2')));
        handle_input(&mut app, press(KeyCode::Down));
        assert_eq!(app.layer_index, 1);
    }
}
