//! Compare view: attribute table beside the radar chart.
//!
//! The radar scene is painted onto a braille canvas. Scene coordinates grow
//! downward while canvas coordinates grow upward, so every y is flipped.

use super::app::ExplorerApp;
use super::theme::{hex_color, Theme};
use crate::views::CompareModel;
use crate::viz::palette;
use crate::viz::scene::{Scene, Shape};
use crate::viz::{Chart, MountStatus, Size};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{self, Canvas, Circle, Context, Rectangle},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Virtual pixels per terminal cell on the radar surface. Cells are about
/// twice as tall as they are wide.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 2;

/// Canvas cells available to the radar in a terminal of the given size:
/// the right half of the body, inside its border.
pub fn canvas_cells((width, height): (u16, u16)) -> (u16, u16) {
    (
        (width / 2).saturating_sub(2),
        height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + 2),
    )
}

/// Radar drawing surface in virtual pixels.
pub fn surface_size(terminal: (u16, u16)) -> Size {
    let (cols, rows) = canvas_cells(terminal);
    Size::new(f64::from(cols) * CELL_WIDTH, f64::from(rows) * CELL_HEIGHT)
}

pub fn render(frame: &mut Frame, app: &ExplorerApp) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    let model = CompareModel::from_snapshot(app.snapshot());
    render_header(frame, &model, chunks[0], &theme);

    if model.methods.is_empty() {
        let text = vec![
            Line::from(Span::styled("Nothing to compare", theme.title_style())),
            Line::from(Span::styled(
                "Press c on a method in the list to add it.",
                theme.muted_style(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_table(frame, &model, body[0], &theme);
        render_radar(frame, app, body[1], &theme);
    }

    let footer = app.status_message().map(str::to_string).unwrap_or_else(|| {
        "Esc back  1-3 remove  x clear  ? help  q quit".to_string()
    });
    frame.render_widget(
        Paragraph::new(Span::styled(footer, theme.muted_style()))
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );
}

fn render_header(frame: &mut Frame, model: &CompareModel<'_>, area: Rect, theme: &Theme) {
    let mut spans = vec![Span::styled("Compare Methods", theme.title_style())];
    for (i, method) in model.methods.iter().enumerate() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}", i + 1, method.name),
            Style::default().fg(hex_color(palette::compare_color(i))),
        ));
    }
    let share = Line::from(Span::styled(
        format!("Share: {}", model.share_route()),
        theme.muted_style(),
    ));
    frame.render_widget(
        Paragraph::new(vec![Line::from(spans), share]).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn render_table(frame: &mut Frame, model: &CompareModel<'_>, area: Rect, theme: &Theme) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(model.methods.iter().enumerate().map(|(i, m)| {
                Cell::from(m.name.clone()).style(
                    Style::default()
                        .fg(hex_color(palette::compare_color(i)))
                        .add_modifier(Modifier::BOLD),
                )
            })),
    );
    let rows = model.rows().into_iter().map(|row| {
        Row::new(
            std::iter::once(Cell::from(row.label).style(theme.muted_style()))
                .chain(row.cells.into_iter().map(Cell::from)),
        )
    });

    let mut widths = vec![Constraint::Length(15)];
    widths.extend(model.methods.iter().map(|_| Constraint::Fill(1)));

    frame.render_widget(
        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(Block::default().borders(Borders::ALL).title("Attributes")),
        area,
    );
}

fn render_radar(frame: &mut Frame, app: &ExplorerApp, area: Rect, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).title("Radar");
    let radar = app.radar();

    let scene = match (radar.status(), radar.chart().scene()) {
        (Some(MountStatus::Mounted), Some(scene)) => scene,
        (Some(MountStatus::Retry { .. }), _) => {
            frame.render_widget(
                Paragraph::new(Span::styled("Waiting for space to draw…", theme.muted_style()))
                    .block(block),
                area,
            );
            return;
        }
        _ => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Radar unavailable. Enlarge the terminal and reopen this view.",
                    theme.muted_style(),
                ))
                .wrap(Wrap { trim: true })
                .block(block),
                area,
            );
            return;
        }
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, scene.width()])
        .y_bounds([0.0, scene.height()])
        .paint(|ctx| paint_scene(ctx, scene));
    frame.render_widget(canvas, area);
}

/// Draw the live nodes of a scene. Filled shapes are drawn as outlines.
fn paint_scene(ctx: &mut Context<'_>, scene: &Scene) {
    let height = scene.height();
    for (_, node) in scene.iter() {
        let style = &node.style;
        let Some(color) = shape_color(style.stroke.as_deref().or(style.fill.as_deref())) else {
            continue;
        };
        // Dimmed series
        let color = if style.opacity.is_some_and(|o| o < 0.5) {
            Color::DarkGray
        } else {
            color
        };

        match &node.shape {
            Shape::Line { x1, y1, x2, y2 } => ctx.draw(&canvas::Line {
                x1: *x1,
                y1: height - y1,
                x2: *x2,
                y2: height - y2,
                color,
            }),
            Shape::Polygon { points } => {
                for (i, (x1, y1)) in points.iter().enumerate() {
                    let (x2, y2) = points[(i + 1) % points.len()];
                    ctx.draw(&canvas::Line {
                        x1: *x1,
                        y1: height - y1,
                        x2,
                        y2: height - y2,
                        color,
                    });
                }
            }
            Shape::Circle { cx, cy, r } => ctx.draw(&Circle {
                x: *cx,
                y: height - cy,
                radius: *r,
                color,
            }),
            Shape::Rect {
                x,
                y,
                width,
                height: h,
                ..
            } => ctx.draw(&Rectangle {
                x: *x,
                y: height - y - h,
                width: *width,
                height: *h,
                color,
            }),
            Shape::Text { x, y, content } => {
                let chars = content.width() as f64;
                let left = match style.text_anchor {
                    Some("middle") => x - chars * CELL_WIDTH / 2.0,
                    Some("end") => x - chars * CELL_WIDTH,
                    _ => *x,
                };
                let color = match style.fill.as_deref() {
                    Some(palette::TEXT) => Color::White,
                    _ => color,
                };
                ctx.print(
                    left.max(0.0),
                    height - y,
                    Span::styled(content.clone(), Style::default().fg(color)),
                );
            }
            Shape::Group | Shape::Path { .. } => {}
        }
    }
}

fn shape_color(color: Option<&str>) -> Option<Color> {
    match color {
        None | Some("none") => None,
        Some(hex) => Some(hex_color(hex)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartsConfig;
    use crate::dataset::Catalog;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};
    use crate::store::{Action, Store};
    use crate::tui::view_mode::ViewMode;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn draw(app: &mut ExplorerApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> ExplorerApp {
        let store = Store::new(Catalog::from_methods(vec![
            method("a", Stage::Collect, &[Modality::Text]),
            method("b", Stage::Preprocess, &[Modality::Image]),
        ]));
        let mut app = ExplorerApp::new(store, &ChartsConfig::default());
        app.on_resize(120, 40, Instant::now());
        app
    }

    #[test]
    fn test_canvas_cells_take_right_half() {
        assert_eq!(canvas_cells((120, 40)), (58, 33));
        assert_eq!(canvas_cells((2, 3)), (0, 0));
        assert!(!surface_size((2, 3)).is_measurable());
    }

    #[test]
    fn test_compare_view_draws_table_and_radar() {
        let mut app = app();
        app.dispatch(Action::ToggleCompareMethod("a".into()));
        app.dispatch(Action::ToggleCompareMethod("b".into()));
        app.open_compare(Instant::now());
        assert_eq!(app.view_mode(), ViewMode::Compare);

        let screen = draw(&mut app, 120, 40);
        assert!(screen.contains("Compare Methods"));
        assert!(screen.contains("Pipeline Stage"));
        assert!(screen.contains("Radar"));
        assert!(screen.contains("/compare?methods=a,b"));
    }

    #[test]
    fn test_empty_compare_set() {
        let mut app = app();
        app.open_compare(Instant::now());
        assert!(draw(&mut app, 120, 40).contains("Nothing to compare"));
    }
}
