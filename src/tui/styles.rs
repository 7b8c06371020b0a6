//! TUI theme and styling

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Background and borders
    pub background: Color,
    pub border: Color,
    pub selection: Color,

    // Text colors
    pub title: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,

    // Selection state
    pub hidden: Color,
    pub sensitive: Color,
    pub directory: Color,

    // UI elements
    pub key: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::phosphor()
    }
}

impl Theme {
    pub fn phosphor() -> Self {
        Self {
            background: Color::Rgb(16, 20, 18),
            border: Color::Rgb(45, 70, 55),
            selection: Color::Rgb(30, 50, 40),

            title: Color::Rgb(57, 255, 20),
            text: Color::Rgb(180, 255, 180),
            dimmed: Color::Rgb(80, 120, 90),
            hint: Color::Rgb(100, 160, 120),

            hidden: Color::Rgb(255, 100, 80),
            sensitive: Color::Rgb(255, 180, 60),
            directory: Color::Rgb(100, 220, 160),

            key: Color::Rgb(255, 180, 60),
            accent: Color::Rgb(57, 255, 20),
        }
    }
}
