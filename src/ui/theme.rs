//! Colour palettes for the dark and light themes

use ratatui::style::{Color, Modifier, Style};

use hospdash::config::Theme;

/// Colours used across the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub key: Color,
    pub danger: Color,
    pub success: Color,
    pub male: Color,
    pub female: Color,
    /// Leve/Bajo through Extremo
    pub levels: [Color; 4],
}

const DARK: Palette = Palette {
    accent: Color::Cyan,
    text: Color::White,
    muted: Color::DarkGray,
    border: Color::Gray,
    key: Color::Yellow,
    danger: Color::Red,
    success: Color::Green,
    male: Color::Blue,
    female: Color::Magenta,
    levels: [Color::Green, Color::Yellow, Color::LightRed, Color::Red],
};

const LIGHT: Palette = Palette {
    accent: Color::Blue,
    text: Color::Black,
    muted: Color::Gray,
    border: Color::DarkGray,
    key: Color::Magenta,
    danger: Color::Red,
    success: Color::Green,
    male: Color::Blue,
    female: Color::Magenta,
    levels: [Color::Green, Color::Yellow, Color::LightRed, Color::Red],
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn block_border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Colour for an ordinal level code 1-4
    pub fn level(&self, code: u8) -> Color {
        self.levels[usize::from(code.clamp(1, 4) - 1)]
    }
}
