mod app;
mod handlers;
mod theme;
mod ui;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use chordkeys_core::{Config, Dispatcher};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use app::App;
use handlers::handle_input;
use ui::draw_ui;

/// Redraw interval; the dispatcher keeps ticking in between
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal monitor driven from the dispatch loop.
///
/// The terminal is restored on drop, so an error in the loop never leaves
/// the shell in raw mode.
pub struct Monitor {
    app: App,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    last_draw: Option<Instant>,
    restored: bool,
}

impl Monitor {
    pub fn start(device_name: &str, config: &Config) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            app: App::new(device_name, config),
            terminal,
            last_draw: None,
            restored: false,
        })
    }

    /// Redraw if a frame is due and handle pending terminal input.
    ///
    /// Returns true when the user asked to quit.
    pub fn update(&mut self, dispatcher: &Dispatcher, overruns: u64, now: Instant) -> io::Result<bool> {
        if self
            .last_draw
            .is_some_and(|last| now.saturating_duration_since(last) < FRAME_INTERVAL)
        {
            return Ok(false);
        }
        self.last_draw = Some(now);

        self.app.update(dispatcher.snapshot(), overruns);
        let app = &self.app;
        self.terminal.draw(|f| draw_ui(f, app))?;

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_input(&mut self.app, key) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn stop(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
