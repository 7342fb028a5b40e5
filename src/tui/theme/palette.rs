use ratatui::prelude::*;

/// Catppuccin Mocha inspired color palette for the monitor
pub struct Palette {
    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_success: Color,
    pub accent_warning: Color,
    pub accent_danger: Color,

    // UI colors
    pub border_default: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Mode badges
    pub bg_mode_idle: Color,
    pub bg_mode_pending: Color,
    pub bg_mode_engaged: Color,

    // Keyboard chips
    pub key_idle: Color,
    pub key_held_input: Color,
    pub key_held_output: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            // Text - Catppuccin text shades
            text_primary: Color::Rgb(205, 214, 244),      // Text
            text_secondary: Color::Rgb(186, 194, 222),    // Subtext1
            text_muted: Color::Rgb(108, 112, 134),        // Overlay0

            // Accents
            accent_primary: Color::Rgb(137, 180, 250),    // Blue
            accent_success: Color::Rgb(166, 227, 161),    // Green
            accent_warning: Color::Rgb(249, 226, 175),    // Yellow
            accent_danger: Color::Rgb(243, 139, 168),     // Red

            // UI
            border_default: Color::Rgb(69, 71, 90),       // Surface1
            border_focused: Color::Rgb(137, 180, 250),    // Blue
            selection_bg: Color::Rgb(137, 180, 250),      // Blue
            selection_fg: Color::Rgb(30, 30, 46),         // Crust

            // Modes
            bg_mode_idle: Color::Rgb(108, 112, 134),      // Overlay0
            bg_mode_pending: Color::Rgb(249, 226, 175),   // Yellow
            bg_mode_engaged: Color::Rgb(166, 227, 161),   // Green

            // Keys
            key_idle: Color::Rgb(69, 71, 90),             // Surface1
            key_held_input: Color::Rgb(250, 179, 135),    // Peach
            key_held_output: Color::Rgb(203, 166, 247),   // Mauve
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }
}
