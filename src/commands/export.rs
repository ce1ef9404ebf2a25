use crate::cli::RunSettings;
use crate::filter::FilterPatch;
use crate::io::HtmlExporter;
use crate::observability::{set_phase, RunPhase};
use crate::store::Action;
use crate::views::parse_compare_list;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub struct ExportConfig {
    pub dir: PathBuf,
    pub filters: FilterPatch,
    pub compare: Vec<String>,
}

pub fn run_export(settings: &RunSettings, config: ExportConfig) -> Result<()> {
    let mut store = crate::cli::require_store(settings)?;
    store.dispatch(Action::SetFilters(config.filters));

    let _phase = set_phase(RunPhase::Exporting);
    let compare = parse_compare_list(&config.compare.join(","));
    let summary = HtmlExporter::new(&config.dir)
        .chart_size(settings.config.charts().size())
        .export(&store.snapshot(), &compare)?;

    println!(
        "{} Wrote {} pages to {}",
        "✓".green(),
        summary.pages.len(),
        config.dir.display()
    );
    Ok(())
}
