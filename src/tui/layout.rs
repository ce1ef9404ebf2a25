//! Shared layout helpers and the help overlay.

use super::app::ExplorerApp;
use super::theme::Theme;
use super::view_mode::ViewMode;
use super::{compare_view, detail_view, list_view};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// A `width` x `height` rect centered in `area`, clipped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "List",
        &[
            ("↑/k ↓/j", "Move selection"),
            ("g/G", "Jump to top/bottom"),
            ("Enter", "Open method detail"),
            ("/", "Search"),
            ("s", "Sort menu"),
            ("f", "Filter menu"),
            ("1-6", "Select pipeline stage (again to clear)"),
            ("m", "Cycle data-source modality"),
            ("r", "Reset filters"),
        ],
    ),
    (
        "Compare",
        &[
            ("c", "Add/remove selected method"),
            ("C", "Open compare view"),
            ("1-3", "Remove a compared method"),
            ("x", "Clear compare set"),
        ],
    ),
    (
        "General",
        &[("Esc", "Back"), ("?", "This help"), ("q, Ctrl+C", "Quit")],
    ),
];

pub fn render_help_overlay(frame: &mut Frame, app: &ExplorerApp) {
    match app.underlying_view() {
        ViewMode::Detail => detail_view::render(frame, app),
        ViewMode::Compare => compare_view::render(frame, app),
        _ => list_view::render(frame, app),
    }

    let theme = Theme::default();
    let mut lines = Vec::new();
    for (section, keys) in HELP {
        lines.push(Line::from(Span::styled(*section, theme.title_style())));
        for (key, action) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(theme.accent())),
                Span::styled(*action, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let area = centered_rect(frame.area(), 56, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Keyboard Shortcuts (any key to close)")
                .border_style(Style::default().fg(theme.accent())),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(area, 100, 100), area);
    }
}
