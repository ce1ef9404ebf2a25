use crate::store::Snapshot;
use crate::viz::{
    render_svg, LandscapeOptions, LandscapePlot, PipelineDiagram, PipelineOptions, RadarChart,
    Size,
};
use crate::views::{CompareModel, DetailModel, ExplorerModel, MethodDetail, PageStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

const TEMPLATE: &str = include_str!("templates/page.html");

/// Static site export: explorer index, one page per method, and an optional
/// comparison page.
pub struct HtmlExporter {
    out_dir: PathBuf,
    chart_size: Size,
    generated: DateTime<Utc>,
}

/// Files written by one export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: Vec<PathBuf>,
}

impl HtmlExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            chart_size: Size::new(960.0, 420.0),
            generated: Utc::now(),
        }
    }

    pub fn chart_size(mut self, size: Size) -> Self {
        self.chart_size = size;
        self
    }

    /// Fix the footer timestamp, mostly for reproducible output.
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated = at;
        self
    }

    pub fn export(&self, snapshot: &Snapshot, compare_ids: &[String]) -> Result<ExportSummary> {
        let _span = tracing::info_span!("export_html", out = %self.out_dir.display()).entered();
        let mut summary = ExportSummary::default();
        let has_compare = !compare_ids.is_empty();

        super::ensure_dir(&self.out_dir.join("methods"))?;

        let index = self.render_index(snapshot, has_compare)?;
        summary.pages.push(self.write_page("index.html", &index)?);

        for method in snapshot.all_methods() {
            let page = self.render_detail(snapshot, &method.id, has_compare)?;
            let name = format!("methods/{}.html", file_stem(&method.id));
            summary.pages.push(self.write_page(&name, &page)?);
        }

        if has_compare {
            let page = self.render_compare(snapshot, compare_ids)?;
            summary.pages.push(self.write_page("compare.html", &page)?);
        }

        tracing::info!(pages = summary.pages.len(), "HTML export complete");
        Ok(summary)
    }

    fn write_page(&self, relative: &str, html: &str) -> Result<PathBuf> {
        let path = self.out_dir.join(relative);
        super::write_file(&path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn render_index(&self, snapshot: &Snapshot, has_compare: bool) -> Result<String> {
        let model = ExplorerModel::from_snapshot(snapshot);
        let mut body = String::new();

        match &model.status {
            PageStatus::Failed(message) => {
                write!(
                    body,
                    "<div class=\"panel\"><h1>Could not load the catalog</h1><p class=\"muted\">{}</p></div>",
                    text(message)
                )?;
                return Ok(self.page("Method Explorer", &body, 0, has_compare, snapshot));
            }
            PageStatus::Loading => {
                body.push_str("<p class=\"muted\">Loading…</p>");
                return Ok(self.page("Method Explorer", &body, 0, has_compare, snapshot));
            }
            PageStatus::Ready => {}
        }

        write!(
            body,
            "<h1>Method Explorer</h1><p class=\"muted\">{}</p>",
            text(&model.summary())
        )?;

        if let Some(catalog) = snapshot.catalog() {
            let pipeline = PipelineOptions::from_dataset(catalog.dataset(), &snapshot.state.ui);
            let svg = render_svg(&mut PipelineDiagram::new(), self.pipeline_size(), &pipeline)
                .context("Failed to render pipeline diagram")?;
            write!(body, "<h2>Pipeline</h2><div class=\"chart\">{}</div>", svg)?;

            let filtered = snapshot.filtered_methods();
            let landscape = LandscapeOptions::new(
                filtered.iter().map(|hit| hit.method),
                catalog.dataset().ordered_steps(),
            )
            .highlighted_stage(snapshot.state.ui.selected_step);
            let svg = render_svg(&mut LandscapePlot::new(), self.chart_size, &landscape)
                .context("Failed to render landscape plot")?;
            write!(body, "<h2>Landscape</h2><div class=\"chart\">{}</div>", svg)?;
        }

        body.push_str("<h2>Methods</h2>");
        if let Some(empty) = model.empty {
            write!(
                body,
                "<div class=\"panel\"><h3>{}</h3><p class=\"muted\">{}</p></div>",
                text(empty.title()),
                text(empty.message())
            )?;
        } else {
            body.push_str("<ul class=\"methods\">");
            for row in &model.rows {
                write!(
                    body,
                    "<li><a href=\"{}\"><strong>{}</strong></a> <span class=\"badge\">{}</span>\
                     <span class=\"badge\">{}</span><p class=\"muted\">{}</p></li>",
                    attr(&detail_href(&row.id, 0)),
                    text(&row.name),
                    text(&row.stage_name),
                    text(row.maturity.display_name()),
                    text(&row.short_description)
                )?;
            }
            body.push_str("</ul>");
        }

        Ok(self.page("Method Explorer", &body, 0, has_compare, snapshot))
    }

    pub fn render_detail(&self, snapshot: &Snapshot, id: &str, has_compare: bool) -> Result<String> {
        let body = match DetailModel::from_snapshot(snapshot, id) {
            DetailModel::Found(detail) => {
                let mut body = String::new();
                write_detail_body(&mut body, &detail)?;
                body
            }
            DetailModel::NotFound { id, .. } => format!(
                "<div class=\"panel\"><h1>Method not found</h1><p class=\"muted\">{}</p>\
                 <p><a href=\"../index.html\">Back to explorer</a></p></div>",
                text(&DetailModel::not_found_message(&id))
            ),
        };
        let title = snapshot
            .method(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "Method not found".to_string());
        Ok(self.page(&title, &body, 1, has_compare, snapshot))
    }

    pub fn render_compare(&self, snapshot: &Snapshot, ids: &[String]) -> Result<String> {
        let model = CompareModel::from_ids(snapshot, ids);
        let mut body = String::from("<h1>Compare Methods</h1>");

        for id in &model.missing {
            write!(
                body,
                "<p class=\"muted\">{}</p>",
                text(&DetailModel::not_found_message(id))
            )?;
        }

        let svg = render_svg(&mut RadarChart::new(), Size::new(480.0, 480.0), &model.radar)
            .context("Failed to render comparison radar")?;
        write!(body, "<div class=\"chart\">{}</div>", svg)?;

        if !model.methods.is_empty() {
            body.push_str("<table><thead><tr><th></th>");
            for method in &model.methods {
                write!(
                    body,
                    "<th><a href=\"{}\">{}</a></th>",
                    attr(&detail_href(&method.id, 0)),
                    text(&method.name)
                )?;
            }
            body.push_str("</tr></thead><tbody>");
            for row in model.rows() {
                write!(body, "<tr><th>{}</th>", text(row.label))?;
                for cell in &row.cells {
                    write!(body, "<td>{}</td>", text(cell))?;
                }
                body.push_str("</tr>");
            }
            body.push_str("</tbody></table>");
        }

        Ok(self.page("Compare Methods", &body, 0, true, snapshot))
    }

    fn pipeline_size(&self) -> Size {
        Size::new(self.chart_size.width, 260.0)
    }

    fn page(&self, title: &str, body: &str, depth: usize, has_compare: bool, snapshot: &Snapshot) -> String {
        let root = "../".repeat(depth);
        let mut nav = format!("<a href=\"{}index.html\">Explorer</a>", root);
        if has_compare {
            nav.push_str(&format!("<a href=\"{}compare.html\">Compare</a>", root));
        }
        let source = snapshot
            .catalog()
            .map(|c| c.source().display().to_string())
            .unwrap_or_default();

        TEMPLATE
            .replace("{{{VERSION}}}", env!("CARGO_PKG_VERSION"))
            .replace("{{{TITLE}}}", &text(title))
            .replace("{{{NAV}}}", &nav)
            .replace("{{{BODY}}}", body)
            .replace(
                "{{{TIMESTAMP}}}",
                &self.generated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            )
            .replace("{{{SOURCE}}}", &text(&source))
    }
}

fn write_detail_body<W: Write>(body: &mut W, detail: &MethodDetail<'_>) -> fmt::Result {
    let method = detail.method;
    write!(
        body,
        "<p><a href=\"../index.html\">← Back to explorer</a></p><h1>{}</h1>\
         <p><span class=\"badge\">{}</span><span class=\"badge\">{}</span>\
         <span class=\"badge\">{}</span></p><p>{}</p>",
        text(&method.name),
        text(&detail.stage_name),
        text(method.maturity.display_name()),
        text(method.automation.display_name()),
        text(&method.description)
    )?;

    if !method.algorithm_summary.is_empty() {
        write!(
            body,
            "<h2>Algorithm</h2><p>{}</p>",
            text(&method.algorithm_summary)
        )?;
    }

    badge_section(body, "Modalities", method.modalities.iter().map(|m| m.display_name()))?;
    badge_section(body, "Tasks", method.tasks.iter().map(|t| t.display_name()))?;
    badge_section(body, "Inputs", method.inputs.iter().map(String::as_str))?;
    badge_section(body, "Outputs", method.outputs.iter().map(String::as_str))?;
    badge_section(body, "Tags", method.tags.iter().map(String::as_str))?;

    let reference = &method.reference;
    if reference.title.is_some() || !reference.authors.is_empty() {
        body.write_str("<h2>Reference</h2><p>")?;
        if !reference.authors.is_empty() {
            write!(body, "{}. ", text(&reference.authors.join(", ")))?;
        }
        if let Some(title) = &reference.title {
            match detail.paper_link() {
                Some(link) => write!(body, "<a href=\"{}\">{}</a>", attr(link), text(title))?,
                None => body.write_str(&text(title))?,
            }
        }
        if let Some(venue) = &reference.venue {
            write!(body, ". {}", text(venue))?;
        }
        if let Some(year) = reference.year {
            write!(body, " ({})", year)?;
        }
        body.write_str("</p>")?;
    }

    let artifacts = detail.artifact_links();
    if !artifacts.is_empty() {
        body.write_str("<h2>Artifacts</h2><ul>")?;
        for (label, link) in artifacts {
            write!(body, "<li><a href=\"{}\">{}</a></li>", attr(link), text(label))?;
        }
        body.write_str("</ul>")?;
    }

    if !detail.related.is_empty() {
        body.write_str("<h2>Related Methods</h2><ul>")?;
        for related in &detail.related {
            match &related.name {
                Some(name) => {
                    write!(
                        body,
                        "<li><a href=\"{}\">{}</a></li>",
                        attr(&detail_href(&related.id, 1)),
                        text(name)
                    )?;
                }
                None => {
                    write!(body, "<li class=\"muted\">{}</li>", text(&related.id))?;
                }
            }
        }
        body.write_str("</ul>")?;
    }

    Ok(())
}

fn badge_section<'s, W: Write>(
    body: &mut W,
    title: &str,
    items: impl Iterator<Item = &'s str>,
) -> fmt::Result {
    let badges: String = items
        .map(|item| format!("<span class=\"badge\">{}</span>", text(item)))
        .collect();
    if badges.is_empty() {
        return Ok(());
    }
    write!(body, "<h2>{}</h2><p>{}</p>", title, badges)
}

/// Link to a detail page from a page `depth` directories below the root.
fn detail_href(id: &str, depth: usize) -> String {
    if depth == 0 {
        format!("methods/{}.html", file_stem(id))
    } else {
        format!("{}.html", file_stem(id))
    }
}

/// Method ids are used as file names; anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Where a detail page for `id` lands inside `out_dir`.
pub fn detail_path(out_dir: &Path, id: &str) -> PathBuf {
    out_dir.join("methods").join(format!("{}.html", file_stem(id)))
}
