//! Named state transitions and the pure reducer that applies them.

use super::state::{AppState, ChangeSet, MAX_COMPARE};
use crate::filter::{FilterPatch, FilterState, SortSpec};
use crate::model::{Modality, Stage};
use std::collections::BTreeSet;

/// Every way the application state can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Select a stage (or clear with `None`). Clears any modality selection.
    SetSelectedStep(Option<Stage>),
    /// Select a data-source modality. Forces the stage to `collect`.
    /// `None` clears both the stage and the modality.
    SetSelectedModality(Option<Modality>),
    SetFilters(FilterPatch),
    ResetFilters,
    /// Add or remove an id from the compare set. A fourth add is rejected.
    ToggleCompareMethod(String),
    ClearCompare,
    SetCompareMode(bool),
    ToggleFilters,
    SetSort(SortSpec),
    SetSelectedMethod(Option<String>),
    SetHoveredMethod(Option<String>),
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetSelectedStep(_) => "set_selected_step",
            Action::SetSelectedModality(_) => "set_selected_modality",
            Action::SetFilters(_) => "set_filters",
            Action::ResetFilters => "reset_filters",
            Action::ToggleCompareMethod(_) => "toggle_compare_method",
            Action::ClearCompare => "clear_compare",
            Action::SetCompareMode(_) => "set_compare_mode",
            Action::ToggleFilters => "toggle_filters",
            Action::SetSort(_) => "set_sort",
            Action::SetSelectedMethod(_) => "set_selected_method",
            Action::SetHoveredMethod(_) => "set_hovered_method",
        }
    }
}

/// Apply `action` to `state`, returning the next state and what changed.
pub fn reduce(state: &AppState, action: &Action) -> (AppState, ChangeSet) {
    let mut next = state.clone();
    apply(&mut next, action);
    let changes = ChangeSet::between(state, &next);
    (next, changes)
}

fn apply(state: &mut AppState, action: &Action) {
    match action {
        Action::SetSelectedStep(step) => {
            state.filters.pipeline_step = *step;
            state.filters.modalities.clear();
            state.ui.selected_step = *step;
            state.ui.selected_modality = None;
        }
        Action::SetSelectedModality(Some(modality)) => {
            state.filters.pipeline_step = Some(Stage::Collect);
            state.filters.modalities = BTreeSet::from([*modality]);
            state.ui.selected_step = Some(Stage::Collect);
            state.ui.selected_modality = Some(*modality);
        }
        Action::SetSelectedModality(None) => {
            state.filters.pipeline_step = None;
            state.filters.modalities.clear();
            state.ui.selected_step = None;
            state.ui.selected_modality = None;
        }
        Action::SetFilters(patch) => {
            patch.clone().apply_to(&mut state.filters);
            sync_highlight(state);
        }
        Action::ResetFilters => {
            state.filters = FilterState::default();
            state.ui.selected_step = None;
            state.ui.selected_modality = None;
        }
        Action::ToggleCompareMethod(id) => toggle_compare(&mut state.selection.compare, id),
        Action::ClearCompare => state.selection.compare.clear(),
        Action::SetCompareMode(on) => state.selection.compare_mode = *on,
        Action::ToggleFilters => state.ui.show_filters = !state.ui.show_filters,
        Action::SetSort(spec) => state.selection.sort = *spec,
        Action::SetSelectedMethod(id) => state.selection.selected_method = id.clone(),
        Action::SetHoveredMethod(id) => state.selection.hovered_method = id.clone(),
    }
}

/// Re-derive the diagram highlight from the filters. A data-source circle
/// stays selected only while the filters are exactly `collect` plus its
/// single modality.
fn sync_highlight(state: &mut AppState) {
    let filters = &state.filters;
    state.ui.selected_step = filters.pipeline_step;
    state.ui.selected_modality = match (filters.pipeline_step, filters.modalities.len()) {
        (Some(Stage::Collect), 1) => filters.modalities.iter().next().copied(),
        _ => None,
    };
}

fn toggle_compare(compare: &mut Vec<String>, id: &str) {
    if let Some(pos) = compare.iter().position(|c| c == id) {
        compare.remove(pos);
    } else if compare.len() < MAX_COMPARE {
        compare.push(id.to_string());
    } else {
        tracing::debug!(id, "compare set is full, ignoring add");
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: no sequence of toggles grows the compare set past its bound.
        #[test]
        fn compare_set_is_bounded(ids in proptest::collection::vec(0u8..6, 0..40)) {
            let mut state = AppState::default();
            for id in ids {
                state = reduce(&state, &Action::ToggleCompareMethod(format!("m{}", id))).0;
                prop_assert!(state.selection.compare.len() <= MAX_COMPARE);
                let unique: BTreeSet<_> = state.selection.compare.iter().collect();
                prop_assert_eq!(unique.len(), state.selection.compare.len());
            }
        }
    }
}
