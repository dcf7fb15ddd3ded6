//! Colors and styles for codeatlas
//!
//! The chrome is greyscale so the only color on screen is the graph: node
//! colors come from the palette, links are a muted indigo.

use crate::tree::Rgb;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);
    pub const GREY_600: Color = Color::Rgb(45, 45, 45);
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);
    pub const BG: Color = Self::GREY_900;

    /// Toast accents
    pub const GREEN: Color = Color::Rgb(100, 200, 100);
    pub const RED: Color = Color::Rgb(200, 100, 100);

    pub const LINK: Color = Color::Rgb(0x4a, 0x4a, 0x8a);
    /// Links touching the hovered node
    pub const LINK_HIGHLIGHT: Color = Self::WHITE;
    /// Everything outside the hovered neighborhood; same grey as the back node
    pub const DIMMED: Color = Color::Rgb(0x6c, 0x75, 0x7d);
    pub const NEIGHBOR: Color = Self::WHITE;

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    /// Current breadcrumb, active tab
    pub fn selected() -> Style {
        Style::default().fg(Self::WHITE).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_600)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::GREY_50).add_modifier(Modifier::BOLD)
    }

    /// Footer key, e.g. ` ? `
    pub fn key_badge() -> Style {
        Style::default().fg(Self::GREY_900).bg(Self::GREY_500)
    }

    pub fn key_label() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    pub const BREADCRUMB_SEPARATOR: &'static str = " › ";
    pub const DOT_SEPARATOR: char = '·';
}

/// Palette color to a terminal color.
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(rgb(Rgb::new(0x61, 0xda, 0xfb)), Color::Rgb(0x61, 0xda, 0xfb));
        assert_eq!(rgb(Rgb::NEUTRAL), Theme::DIMMED);
    }
}
