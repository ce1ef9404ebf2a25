//! List view rendering: header, stage strip, method list and footer, plus
//! the search, sort and filter overlays.

use super::actions::filter_entries;
use super::app::ExplorerApp;
use super::highlight::{highlight_spans, match_positions};
use super::layout::centered_rect;
use super::theme::{modality_color, Theme};
use crate::filter::{SortKey, SortOrder};
use crate::model::Stage;
use crate::views::PageStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Rows taken by everything except the list body.
pub const CHROME_HEIGHT: u16 = 10;

pub fn render(frame: &mut Frame, app: &ExplorerApp) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Stage strip
            Constraint::Min(0),    // List
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], &theme);
    render_stage_strip(frame, app, chunks[1], &theme);
    render_list(frame, app, chunks[2], &theme);
    render_footer(frame, app, chunks[3], &theme);
}

pub fn render_with_search(frame: &mut Frame, app: &ExplorerApp) {
    render(frame, app);

    let theme = Theme::default();
    let area = frame.area();
    let search_area = Rect {
        x: area.width / 4,
        y: 2,
        width: area.width / 2,
        height: 3,
    };

    let widget = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", theme.muted_style()),
        Span::styled(app.search_input().to_string(), Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.accent())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search (Enter to keep, Esc to cancel)")
            .border_style(Style::default().fg(theme.accent())),
    );

    frame.render_widget(Clear, search_area);
    frame.render_widget(widget, search_area);
}

pub fn render_with_sort_menu(frame: &mut Frame, app: &ExplorerApp) {
    render(frame, app);

    let theme = Theme::default();
    let current = app.snapshot().state.selection.sort;
    let menu_area = centered_rect(frame.area(), 40, SortKey::all().len() as u16 + 4);

    let mut items: Vec<ListItem> = SortKey::all()
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let active = *key == current.key;
            let prefix = if active { "▸ " } else { "  " };
            let style = if active {
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(format!("{}. {}{}", i + 1, prefix, key.display_name())).style(style)
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(
        ListItem::new(format!(
            "o. Order: {} {}",
            match current.order {
                SortOrder::Asc => "ascending",
                SortOrder::Desc => "descending",
            },
            current.order.arrow()
        ))
            .style(theme.muted_style()),
    );

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Sort By (number, o to flip, Esc to close)")
            .border_style(Style::default().fg(theme.accent())),
    );

    frame.render_widget(Clear, menu_area);
    frame.render_widget(list, menu_area);
}

pub fn render_with_filter_menu(frame: &mut Frame, app: &ExplorerApp) {
    render(frame, app);

    let theme = Theme::default();
    let entries = filter_entries();
    let area = frame.area();
    let height = area.height.saturating_sub(4).min(entries.len() as u16 + 8);
    let menu_area = centered_rect(area, 44, height);

    let mut lines = Vec::new();
    let mut cursor_line = 0;
    let mut group = "";
    for (i, entry) in entries.iter().enumerate() {
        if entry.group() != group {
            group = entry.group();
            lines.push(Line::from(Span::styled(format!("{}:", group), theme.title_style())));
        }
        let mark = if app.is_filter_active(*entry) { "[x]" } else { "[ ]" };
        let style = if i == app.filter_cursor() {
            cursor_line = lines.len();
            theme.selected_style()
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", mark, entry.label()),
            style,
        )));
    }

    // Keep the cursor line in view.
    let inner_height = usize::from(menu_area.height.saturating_sub(2)).max(1);
    let scroll = (cursor_line + 1).saturating_sub(inner_height);

    let paragraph = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filters (Space toggles, r resets, Esc closes)")
                .border_style(Style::default().fg(theme.accent())),
        );

    frame.render_widget(Clear, menu_area);
    frame.render_widget(paragraph, menu_area);
}

fn render_header(frame: &mut Frame, app: &ExplorerApp, area: Rect, theme: &Theme) {
    let model = app.model();
    let filters = &app.snapshot().state.filters;

    let mut second = vec![
        Span::styled(format!("Sort: {}", model.sort), theme.muted_style()),
        Span::raw("  "),
        Span::styled(format!("Filters: {}", model.active_filters), theme.muted_style()),
        Span::raw("  "),
        Span::styled(
            format!("Compare: {}/3", model.compare_count),
            Style::default().fg(if model.compare_count > 0 {
                theme.success
            } else {
                theme.muted
            }),
        ),
    ];
    if !filters.search_query.trim().is_empty() {
        second.push(Span::raw("  "));
        second.push(Span::styled(
            format!("Search: \"{}\"", filters.search_query.trim()),
            Style::default().fg(theme.warning()),
        ));
    }

    let header = vec![
        Line::from(vec![
            Span::styled("Method Explorer", theme.title_style()),
            Span::raw("  "),
            Span::styled(model.summary(), Style::default().fg(theme.text)),
        ]),
        Line::from(second),
    ];

    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn render_stage_strip(frame: &mut Frame, app: &ExplorerApp, area: Rect, theme: &Theme) {
    let ui = &app.snapshot().state.ui;
    let counts = app
        .snapshot()
        .catalog()
        .map(|c| crate::dataset::count_by_stage(c.methods()))
        .unwrap_or_default();

    let mut spans = Vec::new();
    for stage in Stage::all() {
        let active = ui.selected_step == Some(*stage);
        spans.push(Span::styled(
            format!(
                " {} {} ({}) ",
                stage.order(),
                stage.display_name(),
                counts.get(stage).copied().unwrap_or(0)
            ),
            theme.stage_style(*stage, active),
        ));
        spans.push(Span::raw(" "));
    }

    let source = match ui.selected_modality {
        Some(m) => Span::styled(
            format!("Source: {}", m.display_name()),
            Style::default()
                .fg(modality_color(m))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Source: any (m to cycle)", theme.muted_style()),
    };

    frame.render_widget(
        Paragraph::new(vec![Line::from(spans), Line::from(source)]),
        area,
    );
}

fn render_list(frame: &mut Frame, app: &ExplorerApp, area: Rect, theme: &Theme) {
    let model = app.model();
    let block = Block::default().borders(Borders::ALL).title("Methods");

    if let PageStatus::Failed(message) = &model.status {
        let text = vec![
            Line::from(Span::styled(
                "Could not load the catalog",
                Style::default().fg(theme.warning()).add_modifier(Modifier::BOLD),
            )),
            Line::from(message.clone()),
        ];
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
            area,
        );
        return;
    }
    if let Some(empty) = model.empty {
        let text = vec![
            Line::from(Span::styled(empty.title(), theme.title_style())),
            Line::from(Span::styled(empty.message(), theme.muted_style())),
        ];
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let query = &app.snapshot().state.filters.search_query;
    let visible = usize::from(area.height.saturating_sub(2));
    let items: Vec<ListItem> = model
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset())
        .take(visible)
        .map(|(i, row)| {
            let selected = i == app.selected_index();
            let base = if selected {
                theme.selected_style()
            } else {
                Style::default().fg(theme.text)
            };

            let mut spans = vec![Span::styled(
                if row.compared { "◆ " } else { "  " },
                Style::default().fg(theme.success),
            )];
            let positions = match_positions(app.matcher(), &row.name, query);
            spans.extend(highlight_spans(
                &row.name,
                &positions,
                base,
                base.patch(theme.match_style()),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                row.stage_name.clone(),
                theme.stage_style(row.stage, false),
            ));
            spans.push(Span::styled(
                format!(
                    "  {} · {}",
                    row.maturity.display_name(),
                    row.year.map(|y| y.to_string()).unwrap_or_else(|| "n/a".into())
                ),
                theme.muted_style(),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &ExplorerApp, area: Rect, theme: &Theme) {
    let line = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.success),
        )),
        None => Line::from(Span::styled(
            "↑↓ move  Enter detail  / search  s sort  f filter  1-6 stage  m source  c compare  C view compare  ? help  q quit",
            theme.muted_style(),
        )),
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
}
