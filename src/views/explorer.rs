//! The explorer page: filtered, sorted method list plus its empty states.

use crate::filter::SortSpec;
use crate::model::{Maturity, Method, Modality, Stage};
use crate::store::{LoadStatus, Snapshot};

/// One list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRow {
    pub id: String,
    pub name: String,
    pub stage: Stage,
    pub stage_name: String,
    pub short_description: String,
    pub year: Option<i32>,
    pub maturity: Maturity,
    pub modalities: Vec<Modality>,
    /// Search relevance, 0 is a perfect match. `None` without a query.
    pub score: Option<f64>,
    pub compared: bool,
    pub selected: bool,
}

/// Why the list is empty. The wording depends on whether the user narrowed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The dataset itself has no methods.
    NoMethods,
    /// Filters or search removed everything.
    NoMatches { filters_active: bool },
}

impl EmptyState {
    pub fn title(&self) -> &'static str {
        match self {
            EmptyState::NoMethods => "No methods available",
            EmptyState::NoMatches { filters_active: true } => "No methods match your filters",
            EmptyState::NoMatches { filters_active: false } => "No methods match your search",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoMethods => "The dataset does not contain any methods yet.",
            EmptyState::NoMatches { filters_active: true } => {
                "Try removing a filter or resetting all filters."
            }
            EmptyState::NoMatches { filters_active: false } => {
                "Try a different search term or check the spelling."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Loading,
    Ready,
    /// Load failed; carries the raw error message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerModel {
    pub status: PageStatus,
    pub rows: Vec<MethodRow>,
    pub total: usize,
    pub sort: SortSpec,
    pub active_filters: usize,
    pub search_query: String,
    pub compare_count: usize,
    pub empty: Option<EmptyState>,
}

impl ExplorerModel {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let state = &snapshot.state;
        let status = match &state.load {
            LoadStatus::Loading => PageStatus::Loading,
            LoadStatus::Ready { .. } => PageStatus::Ready,
            LoadStatus::Failed(err) => PageStatus::Failed(err.to_string()),
        };

        let dataset = snapshot.catalog().map(|c| c.dataset().clone());
        let rows: Vec<MethodRow> = snapshot
            .sorted_methods()
            .into_iter()
            .map(|hit| {
                let stage_name = dataset
                    .as_ref()
                    .map(|d| d.step_name(hit.method.pipeline_step).to_string())
                    .unwrap_or_else(|| hit.method.pipeline_step.display_name().to_string());
                row(hit.method, stage_name, hit.score, snapshot)
            })
            .collect();

        let total = snapshot.all_methods().len();
        let empty = match (&status, rows.is_empty()) {
            (PageStatus::Ready, true) if total == 0 => Some(EmptyState::NoMethods),
            (PageStatus::Ready, true) => Some(EmptyState::NoMatches {
                filters_active: state.filters.active_count() > 0,
            }),
            _ => None,
        };

        Self {
            status,
            rows,
            total,
            sort: state.selection.sort,
            active_filters: state.filters.active_count(),
            search_query: state.filters.search_query.clone(),
            compare_count: state.selection.compare.len(),
            empty,
        }
    }

    /// "Showing 3 of 12 methods".
    pub fn summary(&self) -> String {
        format!("Showing {} of {} methods", self.rows.len(), self.total)
    }
}

fn row(method: &Method, stage_name: String, score: Option<f64>, snapshot: &Snapshot) -> MethodRow {
    let selection = &snapshot.state.selection;
    MethodRow {
        id: method.id.clone(),
        name: method.name.clone(),
        stage: method.pipeline_step,
        stage_name,
        short_description: method.short_description.clone(),
        year: method.year(),
        maturity: method.maturity,
        modalities: method.modalities.clone(),
        score,
        compared: selection.is_compared(&method.id),
        selected: selection.selected_method.as_deref() == Some(method.id.as_str()),
    }
}
