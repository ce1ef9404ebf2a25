use crate::cli::{ListFormat, RunSettings};
use crate::filter::{FilterPatch, SortSpec};
use crate::observability::{set_phase, RunPhase};
use crate::store::{Action, Store};
use crate::views::{ExplorerModel, MethodRow, PageStatus};
use anyhow::Result;
use colored::Colorize;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

pub struct ListConfig {
    pub filters: FilterPatch,
    pub sort: Option<SortSpec>,
    pub format: ListFormat,
    pub limit: Option<usize>,
}

pub fn run_list(settings: &RunSettings, config: ListConfig) -> Result<()> {
    let mut store = crate::cli::require_store(settings)?;
    let model = list_model(&mut store, &config);
    let output = match config.format {
        ListFormat::Table => render_table(&model, config.limit, settings.plain),
        ListFormat::Json => render_json(&model, config.limit)?,
    };
    println!("{}", output);
    Ok(())
}

/// Apply the requested filters and sort, then build the page model.
pub fn list_model(store: &mut Store, config: &ListConfig) -> ExplorerModel {
    let _phase = set_phase(RunPhase::Filtering);
    store.dispatch(Action::SetFilters(config.filters.clone()));
    if let Some(sort) = config.sort {
        store.dispatch(Action::SetSort(sort));
    }
    ExplorerModel::from_snapshot(&store.snapshot())
}

pub fn render_table(model: &ExplorerModel, limit: Option<usize>, plain: bool) -> String {
    if let PageStatus::Failed(message) = &model.status {
        return format!("{} {}", "Could not load the catalog:".red().bold(), message);
    }
    if let Some(empty) = model.empty {
        return format!("{}\n{}", empty.title().bold(), empty.message().dimmed());
    }

    let mut table = Table::new();
    table
        .load_preset(if plain { NOTHING } else { UTF8_FULL })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Name", "Stage", "Year", "Maturity", "Modalities"]);

    for row in model.rows.iter().take(limit.unwrap_or(usize::MAX)) {
        table.add_row(vec![
            Cell::new(&row.id),
            Cell::new(name_cell(row)),
            Cell::new(&row.stage_name),
            Cell::new(row.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(row.maturity.display_name()),
            Cell::new(
                row.modalities
                    .iter()
                    .map(|m| m.display_name())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ]);
    }

    format!(
        "{}\n{}  {}",
        table,
        model.summary().dimmed(),
        format!("sorted by {}", model.sort).dimmed()
    )
}

fn name_cell(row: &MethodRow) -> String {
    match row.score {
        Some(score) => format!("{} ({:.2})", row.name, score),
        None => row.name.clone(),
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    name: &'a str,
    stage: &'a str,
    year: Option<i32>,
    maturity: &'a str,
    modalities: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

pub fn render_json(model: &ExplorerModel, limit: Option<usize>) -> Result<String> {
    let rows: Vec<JsonRow<'_>> = model
        .rows
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|row| JsonRow {
            id: &row.id,
            name: &row.name,
            stage: row.stage.as_str(),
            year: row.year,
            maturity: row.maturity.as_str(),
            modalities: row.modalities.iter().map(|m| m.as_str()).collect(),
            score: row.score,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Catalog;
    use crate::filter::{SortKey, SortOrder};
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};

    fn store() -> Store {
        Store::new(Catalog::from_methods(vec![
            method("speech", Stage::Collect, &[Modality::Audio]),
            method("frames", Stage::Preprocess, &[Modality::Video]),
            method("ocr", Stage::Preprocess, &[Modality::Image]),
        ]))
    }

    fn config(filters: FilterPatch) -> ListConfig {
        ListConfig {
            filters,
            sort: Some(SortSpec {
                key: SortKey::Name,
                order: SortOrder::Desc,
            }),
            format: ListFormat::Json,
            limit: None,
        }
    }

    #[test]
    fn test_list_model_filters_and_sorts() {
        let mut store = store();
        let model = list_model(
            &mut store,
            &config(FilterPatch::new().pipeline_step(Some(Stage::Preprocess))),
        );
        let ids: Vec<_> = model.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ocr", "frames"]);
    }

    #[test]
    fn test_json_output_respects_limit() {
        let mut store = store();
        let model = list_model(&mut store, &config(FilterPatch::new()));
        let json = render_json(&model, Some(1)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["id"], "speech");
        assert!(parsed[0].get("score").is_none());
    }

    #[test]
    fn test_table_shows_empty_state() {
        let mut store = store();
        let model = list_model(
            &mut store,
            &config(FilterPatch::new().modalities([Modality::Sensor])),
        );
        let table = render_table(&model, None, true);
        assert!(table.contains("No methods match your filters"));
    }
}
