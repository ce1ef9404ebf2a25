use crate::cli::RunSettings;
use crate::observability::{set_phase, RunPhase};
use crate::store::MAX_COMPARE;
use crate::viz::{self, RadarChart};
use crate::views::{parse_compare_list, CompareModel, Route};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{Cell, ContentArrangement, Table};
use std::path::PathBuf;
use url::Url;

pub struct CompareConfig {
    pub ids: Vec<String>,
    pub link: Option<String>,
    pub svg: Option<PathBuf>,
}

pub fn run_compare(settings: &RunSettings, config: CompareConfig) -> Result<()> {
    let ids = match &config.link {
        Some(link) => ids_from_link(link, settings.base_path())?,
        None => parse_compare_list(&config.ids.join(",")),
    };
    if config.link.is_none() && config.ids.len() > MAX_COMPARE {
        tracing::warn!(
            requested = config.ids.len(),
            "Only the first {} methods are compared",
            MAX_COMPARE
        );
    }

    let store = crate::cli::require_store(settings)?;
    let snapshot = store.snapshot();
    let model = CompareModel::from_ids(&snapshot, &ids);

    for id in &model.missing {
        eprintln!("{} unknown method '{}' skipped", "warning:".yellow().bold(), id);
    }
    println!("{}", render_table(&model, settings.plain));

    if let Some(path) = &config.svg {
        let _phase = set_phase(RunPhase::Rendering);
        let svg = viz::render_svg(
            &mut RadarChart::new(),
            settings.config.charts().size(),
            &model.radar,
        )?;
        crate::io::write_output(path, &svg)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote radar chart");
    }
    Ok(())
}

/// Compare ids from a deep link: a full URL or a `/compare?methods=...` path.
pub fn ids_from_link(link: &str, base_path: &str) -> Result<Vec<String>> {
    let path_and_query = match Url::parse(link) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        Err(_) => link.to_string(),
    };
    match Route::parse(&path_and_query, base_path)? {
        Route::Compare(ids) => Ok(ids),
        other => bail!("'{}' is not a compare link (resolved to {:?})", link, other),
    }
}

pub fn render_table(model: &CompareModel<'_>, plain: bool) -> String {
    if model.methods.is_empty() {
        return format!(
            "{}\n{}",
            "Nothing to compare".bold(),
            "Pick two or three methods to compare them side by side.".dimmed()
        );
    }

    let mut header = vec![Cell::new("")];
    header.extend(model.methods.iter().map(|m| Cell::new(&m.name)));

    let mut table = Table::new();
    table
        .load_preset(if plain { NOTHING } else { UTF8_FULL })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in model.rows() {
        let mut cells = vec![Cell::new(row.label)];
        cells.extend(row.cells.iter().map(Cell::new));
        table.add_row(cells);
    }

    let mut out = table.to_string();
    if !model.is_drawable() {
        out.push_str(&format!(
            "\n{}",
            "Add at least two methods to draw the radar chart.".dimmed()
        ));
    }
    out.push_str(&format!(
        "\n{} {}",
        "Share:".dimmed(),
        model.share_route().to_path("")
    ));
    out
}
