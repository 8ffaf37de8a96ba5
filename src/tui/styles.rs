//! TUI theme and styling

use ratatui::style::Color;

use crate::todoist::Priority;

#[derive(Debug, Clone)]
pub struct Theme {
    // Background and borders
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub selection: Color,

    // Text colors
    pub title: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,
    pub accent: Color,

    // Empty-state messages
    pub celebrate: Color,
    pub calm: Color,

    // Priority colors, most urgent first
    pub priority: [Color; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}

impl Theme {
    pub fn midnight() -> Self {
        Self {
            background: Color::Rgb(30, 30, 30),
            surface: Color::Rgb(45, 45, 45),
            border: Color::Rgb(77, 77, 77),
            selection: Color::Rgb(61, 61, 61),

            title: Color::Rgb(255, 255, 255),
            text: Color::Rgb(230, 230, 230),
            dimmed: Color::Rgb(128, 128, 128),
            hint: Color::Rgb(150, 150, 150),
            accent: Color::Rgb(255, 160, 122),

            celebrate: Color::Rgb(152, 251, 152),
            calm: Color::Rgb(176, 196, 222),

            priority: [
                Color::Rgb(255, 107, 107),
                Color::Rgb(255, 160, 122),
                Color::Rgb(152, 251, 152),
                Color::Rgb(176, 196, 222),
            ],
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        self.priority[usize::from(priority.level() - 1)]
    }
}
