//! Color theme for the terminal explorer.

use crate::model::{Modality, Stage};
use crate::viz::palette;
use ratatui::style::{Color, Modifier, Style};

/// Explorer color scheme
pub struct Theme {
    /// Accent for focused elements and titles
    pub primary: Color,
    /// Compared methods and confirmations
    pub success: Color,
    /// Hints, counts and inactive elements
    pub muted: Color,
    pub text: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            primary: Color::Cyan,
            success: Color::Green,
            muted: Color::DarkGray,
            text: Color::White,
        }
    }

    pub fn accent(&self) -> Color {
        self.primary
    }

    pub fn warning(&self) -> Color {
        Color::Yellow
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(Color::Rgb(30, 41, 59))
            .add_modifier(Modifier::BOLD)
    }

    /// Matched characters in a fuzzy-highlighted name.
    pub fn match_style(&self) -> Style {
        Style::default()
            .fg(self.warning())
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn stage_style(&self, stage: Stage, active: bool) -> Style {
        let style = Style::default().fg(stage_color(stage));
        if active {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

/// Terminal color for a `#rrggbb` palette entry.
pub fn hex_color(hex: &str) -> Color {
    palette::hex_to_rgb(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Reset)
}

pub fn stage_color(stage: Stage) -> Color {
    hex_color(palette::stage_color(stage))
}

pub fn modality_color(modality: Modality) -> Color {
    hex_color(palette::modality_color(modality))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_convert() {
        assert_eq!(hex_color("#0ea5e9"), Color::Rgb(0x0e, 0xa5, 0xe9));
        assert_eq!(hex_color("none"), Color::Reset);
        assert_ne!(stage_color(Stage::Collect), stage_color(Stage::ApplyMining));
    }

    #[test]
    fn test_active_stage_is_emphasized() {
        let theme = Theme::default_theme();
        assert_ne!(
            theme.stage_style(Stage::Preprocess, true),
            theme.stage_style(Stage::Preprocess, false)
        );
    }
}
