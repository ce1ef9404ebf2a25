//! Detail view for the selected method.

use super::app::ExplorerApp;
use super::theme::{modality_color, Theme};
use crate::views::{DetailModel, MethodDetail};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &ExplorerApp) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(frame.area());

    let Some(id) = app.detail_id() else {
        frame.render_widget(
            Paragraph::new("No method selected").block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );
        return;
    };

    match DetailModel::from_snapshot(app.snapshot(), id) {
        DetailModel::Found(detail) => render_found(frame, &detail, chunks[0], &theme),
        DetailModel::NotFound { id, .. } => {
            let text = vec![
                Line::from(Span::styled("Method not found", theme.title_style())),
                Line::from(DetailModel::not_found_message(&id)),
                Line::from(Span::styled("Esc to go back", theme.muted_style())),
            ];
            frame.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
                chunks[0],
            );
        }
    }

    let footer = app.status_message().map(str::to_string).unwrap_or_else(|| {
        "Esc back  ↑↓ previous/next  c compare  C view compare  ? help  q quit".to_string()
    });
    frame.render_widget(
        Paragraph::new(Span::styled(footer, theme.muted_style()))
            .block(Block::default().borders(Borders::TOP)),
        chunks[1],
    );
}

fn render_found(frame: &mut Frame, detail: &MethodDetail<'_>, area: Rect, theme: &Theme) {
    let method = detail.method;
    let label = |text: &'static str| Span::styled(format!("{:<12}", text), theme.muted_style());

    let mut lines = vec![
        Line::from(vec![
            Span::styled(method.name.clone(), theme.title_style()),
            Span::raw("  "),
            Span::styled(method.id.clone(), theme.muted_style()),
            Span::raw(if detail.compared { "  ◆ in compare" } else { "" }),
        ]),
        Line::from(vec![
            Span::styled(detail.stage_name.clone(), theme.stage_style(method.pipeline_step, false)),
            Span::styled(
                format!(
                    " · {} · {}",
                    method.maturity.display_name(),
                    method.automation.display_name()
                ),
                Style::default().fg(theme.text),
            ),
        ]),
        Line::from(""),
    ];

    for text in [&method.short_description, &method.description] {
        if !text.is_empty() {
            lines.push(Line::from(text.clone()));
            lines.push(Line::from(""));
        }
    }
    if !method.algorithm_summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "Algorithm",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(method.algorithm_summary.clone()));
        lines.push(Line::from(""));
    }

    let mut modalities = vec![label("Modalities")];
    for m in &method.modalities {
        modalities.push(Span::styled(
            format!("{} ", m.display_name()),
            Style::default().fg(modality_color(*m)),
        ));
    }
    lines.push(Line::from(modalities));

    let rows: [(&'static str, String); 5] = [
        ("Tasks", join(method.tasks.iter().map(|t| t.display_name()))),
        ("Inputs", join(method.inputs.iter().map(String::as_str))),
        ("Outputs", join(method.outputs.iter().map(String::as_str))),
        ("Evidence", method.evidence_type.clone()),
        ("Tags", join(method.tags.iter().map(String::as_str))),
    ];
    for (name, value) in rows {
        if !value.is_empty() {
            lines.push(Line::from(vec![label(name), Span::raw(value)]));
        }
    }

    let reference = &method.reference;
    if let Some(title) = &reference.title {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![label("Paper"), Span::raw(title.clone())]));
        let byline = join(reference.authors.iter().map(String::as_str));
        if !byline.is_empty() || reference.year.is_some() {
            lines.push(Line::from(vec![
                label(""),
                Span::styled(
                    match reference.year {
                        Some(year) => format!("{} ({})", byline, year),
                        None => byline,
                    },
                    theme.muted_style(),
                ),
            ]));
        }
    }
    if let Some(link) = detail.paper_link() {
        lines.push(Line::from(vec![label("Link"), Span::raw(link.to_string())]));
    }
    for (name, link) in detail.artifact_links() {
        lines.push(Line::from(vec![label(name), Span::raw(link.to_string())]));
    }

    if !detail.related.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Related",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for link in &detail.related {
            lines.push(match &link.name {
                Some(name) => Line::from(vec![
                    Span::raw(format!("  {} ", name)),
                    Span::styled(link.id.clone(), theme.muted_style()),
                ]),
                None => Line::from(Span::styled(
                    format!("  {} (not in catalog)", link.id),
                    theme.muted_style(),
                )),
            });
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Method")),
        area,
    );
}

fn join<'s>(items: impl Iterator<Item = &'s str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
