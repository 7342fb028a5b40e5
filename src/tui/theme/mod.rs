mod palette;

use chordkeys_core::{EdgeCommand, Mode};
use ratatui::prelude::*;

pub use palette::Palette;

pub struct Theme {
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
        }
    }

    // Panel border style
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.border_default)
        }
    }

    // Mode badge style
    pub fn mode_badge(&self, mode: &Mode) -> Style {
        let bg = match mode {
            Mode::Idle => self.palette.bg_mode_idle,
            Mode::Pending { .. } => self.palette.bg_mode_pending,
            Mode::Engaged { .. } => self.palette.bg_mode_engaged,
        };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    // Keyboard chip, highlighted when held
    pub fn key_chip(&self, held: bool, output: bool) -> Style {
        match (held, output) {
            (false, _) => Style::default().fg(self.palette.key_idle),
            (true, false) => Style::default()
                .fg(self.palette.selection_fg)
                .bg(self.palette.key_held_input)
                .add_modifier(Modifier::BOLD),
            (true, true) => Style::default()
                .fg(self.palette.selection_fg)
                .bg(self.palette.key_held_output)
                .add_modifier(Modifier::BOLD),
        }
    }

    // Device event line by command
    pub fn event_command(&self, command: EdgeCommand) -> Style {
        match command {
            EdgeCommand::Press => Style::default().fg(self.palette.accent_success),
            EdgeCommand::Repeat => Style::default().fg(self.palette.text_muted),
            EdgeCommand::Release => Style::default().fg(self.palette.accent_danger),
        }
    }

    // Primary text
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    // Secondary/dimmed text
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.palette.text_secondary)
    }

    // Muted text (hints, labels)
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    // Title style for focused panel
    pub fn title_focused(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    // Title style for unfocused panel
    pub fn title_unfocused(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    // Key hint style (the key part like "Tab")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    // Status message style
    pub fn status_message(&self) -> Style {
        Style::default().fg(self.palette.accent_warning)
    }

    // Selected list row
    pub fn selection(&self) -> Style {
        Style::default()
            .fg(self.palette.selection_fg)
            .bg(self.palette.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    // Panel title with optional focus indicator
    pub fn panel_title(&self, title: &str, focused: bool) -> Line<'_> {
        if focused {
            Line::styled(format!(" {} ", title), self.title_focused())
        } else {
            Line::styled(format!(" {} ", title), self.title_unfocused())
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::new)
}
