//! The application state tree owned by the [`Store`](super::Store).

use crate::errors::LoadError;
use crate::filter::{FilterState, SortSpec};
use crate::model::{Modality, Stage};

/// Maximum number of methods in the compare set.
pub const MAX_COMPARE: usize = 3;

/// Selection and comparison state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Method shown in the detail view.
    pub selected_method: Option<String>,
    /// Method under the pointer, if any.
    pub hovered_method: Option<String>,
    /// Ordered compare set, at most [`MAX_COMPARE`] ids.
    pub compare: Vec<String>,
    pub compare_mode: bool,
    pub sort: SortSpec,
}

impl SelectionState {
    pub fn is_compared(&self, id: &str) -> bool {
        self.compare.iter().any(|c| c == id)
    }

    pub fn compare_is_full(&self) -> bool {
        self.compare.len() >= MAX_COMPARE
    }
}

/// Presentation state shared by the views.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub show_filters: bool,
    /// Stage highlighted in the pipeline diagram.
    pub selected_step: Option<Stage>,
    /// Data-source modality highlighted in the pipeline diagram.
    pub selected_modality: Option<Modality>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_filters: true,
            selected_step: None,
            selected_modality: None,
        }
    }
}

/// Where the dataset load stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready {
        method_count: usize,
        warning_count: usize,
    },
    Failed(LoadError),
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready { .. })
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Complete application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub filters: FilterState,
    pub selection: SelectionState,
    pub ui: UiState,
    pub load: LoadStatus,
}

/// Which parts of the state a transition touched.
///
/// Chart bindings rebuild on `filters` and `sort`, and restyle on the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub filters: bool,
    pub selection: bool,
    pub compare: bool,
    pub sort: bool,
    pub ui: bool,
}

impl ChangeSet {
    pub fn between(before: &AppState, after: &AppState) -> Self {
        Self {
            filters: before.filters != after.filters,
            selection: before.selection.selected_method != after.selection.selected_method
                || before.selection.hovered_method != after.selection.hovered_method,
            compare: before.selection.compare != after.selection.compare
                || before.selection.compare_mode != after.selection.compare_mode,
            sort: before.selection.sort != after.selection.sort,
            ui: before.ui != after.ui,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.filters || self.selection || self.compare || self.sort || self.ui)
    }

    /// Filtered data changed, so data-bound charts must be rebuilt.
    pub fn needs_recreate(&self) -> bool {
        self.filters || self.sort
    }

    /// Only presentation changed; charts can restyle in place.
    pub fn needs_update(&self) -> bool {
        !self.needs_recreate() && (self.selection || self.ui || self.compare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();
        assert!(!state.filters.is_active());
        assert!(state.selection.compare.is_empty());
        assert!(state.ui.show_filters);
        assert_eq!(state.load, LoadStatus::Loading);
    }

    #[test]
    fn test_change_set_between_identical_states() {
        let state = AppState::default();
        assert!(ChangeSet::between(&state, &state).is_empty());
    }

    #[test]
    fn test_hover_is_update_only() {
        let before = AppState::default();
        let mut after = before.clone();
        after.selection.hovered_method = Some("m1".into());

        let changes = ChangeSet::between(&before, &after);
        assert!(changes.selection);
        assert!(changes.needs_update());
        assert!(!changes.needs_recreate());
    }

    #[test]
    fn test_filter_change_needs_recreate() {
        let before = AppState::default();
        let mut after = before.clone();
        after.filters.search_query = "ocr".into();
        after.ui.selected_step = Some(Stage::Collect);

        let changes = ChangeSet::between(&before, &after);
        assert!(changes.needs_recreate());
        assert!(!changes.needs_update());
    }
}
