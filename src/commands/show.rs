use crate::cli::RunSettings;
use crate::views::{DetailModel, MethodDetail};
use anyhow::Result;
use colored::Colorize;
use std::fmt::{self, Write};

pub struct ShowConfig {
    pub id: String,
    pub json: bool,
}

/// Print one method. An unknown id prints the not-found panel and succeeds.
pub fn run_show(settings: &RunSettings, config: ShowConfig) -> Result<()> {
    let store = crate::cli::require_store(settings)?;
    let snapshot = store.snapshot();
    let model = DetailModel::from_snapshot(&snapshot, &config.id);

    let output = match (&model, config.json) {
        (DetailModel::Found(detail), true) => serde_json::to_string_pretty(detail.method)?,
        _ => render_detail(&model)?,
    };
    println!("{}", output);
    Ok(())
}

pub fn render_detail(model: &DetailModel<'_>) -> Result<String> {
    let text = match model {
        DetailModel::Found(detail) => {
            let mut out = String::new();
            write_found(&mut out, detail)?;
            out.trim_end().to_string()
        }
        DetailModel::NotFound { id, .. } => format!(
            "{}\n{}\n\n{}",
            "Method not found".yellow().bold(),
            DetailModel::not_found_message(id),
            "Run `methodscope list` to see available methods.".dimmed()
        ),
    };
    Ok(text)
}

fn write_found<W: Write>(out: &mut W, detail: &MethodDetail<'_>) -> fmt::Result {
    let method = detail.method;

    writeln!(out, "{}  {}", method.name.bold(), method.id.dimmed())?;
    writeln!(
        out,
        "{} · {} · {}",
        detail.stage_name.cyan(),
        method.maturity.display_name(),
        method.automation.display_name()
    )?;
    if !method.short_description.is_empty() {
        writeln!(out, "\n{}", method.short_description)?;
    }
    if !method.description.is_empty() {
        writeln!(out, "\n{}", method.description)?;
    }
    if !method.algorithm_summary.is_empty() {
        writeln!(out, "\n{}\n{}", "Algorithm".bold(), method.algorithm_summary)?;
    }

    writeln!(out)?;
    field(out, "Inputs", &method.inputs.join(", "))?;
    field(out, "Outputs", &method.outputs.join(", "))?;
    field(
        out,
        "Modalities",
        &method
            .modalities
            .iter()
            .map(|m| m.display_name())
            .collect::<Vec<_>>()
            .join(", "),
    )?;
    field(
        out,
        "Tasks",
        &method
            .tasks
            .iter()
            .map(|t| t.display_name())
            .collect::<Vec<_>>()
            .join(", "),
    )?;
    field(out, "Evidence", &method.evidence_type)?;
    field(out, "Tags", &method.tags.join(", "))?;

    let reference = &method.reference;
    if reference.title.is_some() || !reference.authors.is_empty() {
        writeln!(out, "\n{}", "Reference".bold())?;
        if let Some(title) = &reference.title {
            writeln!(out, "  {}", title)?;
        }
        let published = [
            reference.venue.clone(),
            reference.year.map(|y| y.to_string()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        let mut byline = reference.authors.join(", ");
        if !published.is_empty() {
            byline = format!("{} ({})", byline, published);
        }
        if !byline.trim().is_empty() {
            writeln!(out, "  {}", byline.trim().dimmed())?;
        }
    }
    if let Some(link) = detail.paper_link() {
        field(out, "Paper", link)?;
    }
    for (label, link) in detail.artifact_links() {
        field(out, label, link)?;
    }

    if !detail.related.is_empty() {
        writeln!(out, "\n{}", "Related".bold())?;
        for link in &detail.related {
            match &link.name {
                Some(name) => writeln!(out, "  {} ({})", name, link.id.dimmed())?,
                None => writeln!(out, "  {} {}", link.id, "(not in catalog)".dimmed())?,
            }
        }
    }

    Ok(())
}

fn field<W: Write>(out: &mut W, label: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        return Ok(());
    }
    writeln!(out, "{:>11}  {}", label.dimmed(), value)
}
