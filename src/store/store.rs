//! The single writer for application state.

use super::actions::{reduce, Action};
use super::state::{AppState, ChangeSet, LoadStatus};
use crate::dataset::Catalog;
use crate::errors::LoadError;
use crate::filter::{filter_positions, sort_methods, FilterState, MethodHit, ScoredPosition};
use crate::model::{Dataset, Method};
use crate::search::SearchIndex;
use std::sync::Arc;

/// Cache key for the derived filtered list.
///
/// Dataset and index are compared by identity, filters by value.
#[derive(Debug, Clone, PartialEq)]
struct MemoKey {
    dataset: usize,
    index: usize,
    filters: FilterState,
}

impl MemoKey {
    fn new(dataset: &Arc<Dataset>, index: &Arc<SearchIndex>, filters: &FilterState) -> Self {
        Self {
            dataset: Arc::as_ptr(dataset) as usize,
            index: Arc::as_ptr(index) as usize,
            filters: filters.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct Memo {
    key: MemoKey,
    positions: Arc<[ScoredPosition]>,
}

/// Owns the state tree. All mutation goes through [`Store::dispatch`].
#[derive(Debug)]
pub struct Store {
    catalog: Option<Catalog>,
    state: Arc<AppState>,
    memo: Option<Memo>,
    derivations: usize,
}

impl Store {
    /// Store for a loaded catalog.
    pub fn new(catalog: Catalog) -> Self {
        let state = AppState {
            load: LoadStatus::Ready {
                method_count: catalog.methods().len(),
                warning_count: catalog.warnings().len(),
            },
            ..AppState::default()
        };
        let mut store = Self {
            catalog: Some(catalog),
            state: Arc::new(state),
            memo: None,
            derivations: 0,
        };
        store.refresh_derived();
        store
    }

    /// Store whose dataset failed to load. Every view reads the failure
    /// from the state instead of loading again.
    pub fn failed(error: LoadError) -> Self {
        Self {
            catalog: None,
            state: Arc::new(AppState {
                load: LoadStatus::Failed(error),
                ..AppState::default()
            }),
            memo: None,
            derivations: 0,
        }
    }

    pub fn from_load(result: Result<Catalog, LoadError>) -> Self {
        match result {
            Ok(catalog) => Self::new(catalog),
            Err(error) => Self::failed(error),
        }
    }

    /// Apply one action. Returns what changed so bindings can decide
    /// between a chart rebuild and a restyle.
    pub fn dispatch(&mut self, action: Action) -> ChangeSet {
        let (next, changes) = reduce(&self.state, &action);
        tracing::debug!(action = action.name(), ?changes, "dispatch");
        if changes.is_empty() {
            return changes;
        }
        self.state = Arc::new(next);
        if changes.filters {
            self.refresh_derived();
        }
        changes
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Read-only view of the current state and its derived list.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: Arc::clone(&self.state),
            catalog: self.catalog.clone(),
            filtered: self
                .memo
                .as_ref()
                .map(|m| Arc::clone(&m.positions))
                .unwrap_or_else(|| Arc::from(Vec::new())),
        }
    }

    /// How many times the filtered list has been recomputed.
    pub fn derivations(&self) -> usize {
        self.derivations
    }

    fn refresh_derived(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let key = MemoKey::new(catalog.dataset(), catalog.index(), &self.state.filters);
        if self.memo.as_ref().is_some_and(|m| m.key == key) {
            return;
        }
        let positions = filter_positions(catalog.methods(), catalog.index(), &self.state.filters);
        tracing::trace!(kept = positions.len(), "filtered methods recomputed");
        self.derivations += 1;
        self.memo = Some(Memo {
            key,
            positions: positions.into(),
        });
    }
}

/// Immutable view handed to readers.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: Arc<AppState>,
    catalog: Option<Catalog>,
    filtered: Arc<[ScoredPosition]>,
}

impl Snapshot {
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Every loaded method, unfiltered.
    pub fn all_methods(&self) -> &[Method] {
        self.catalog.as_ref().map(Catalog::methods).unwrap_or(&[])
    }

    /// Methods that pass the current filters, in filter order.
    pub fn filtered_methods(&self) -> Vec<MethodHit<'_>> {
        let methods = self.all_methods();
        self.filtered
            .iter()
            .filter_map(|p| {
                methods.get(p.position).map(|method| MethodHit {
                    method,
                    position: p.position,
                    score: p.score,
                })
            })
            .collect()
    }

    /// Filtered methods in the current sort order.
    pub fn sorted_methods(&self) -> Vec<MethodHit<'_>> {
        let sort = self.state.selection.sort;
        sort_methods(&self.filtered_methods(), sort.key, sort.order)
    }

    pub fn method(&self, id: &str) -> Option<&Method> {
        self.catalog.as_ref().and_then(|c| c.method(id))
    }

    /// Methods in the compare set that exist, in compare order.
    pub fn compared_methods(&self) -> Vec<&Method> {
        self.state
            .selection
            .compare
            .iter()
            .filter_map(|id| self.method(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPatch;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};

    fn store() -> Store {
        Store::new(Catalog::from_methods(vec![
            method("m1", Stage::Collect, &[Modality::Text]),
            method("m2", Stage::Preprocess, &[Modality::Image]),
            method("m3", Stage::ApplyMining, &[Modality::Text, Modality::Video]),
        ]))
    }

    fn ids(snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .filtered_methods()
            .iter()
            .map(|h| h.method.id.clone())
            .collect()
    }

    #[test]
    fn test_modality_filter_through_store() {
        let mut store = store();
        store.dispatch(Action::SetFilters(FilterPatch::new().modalities([Modality::Text])));
        assert_eq!(ids(&store.snapshot()), vec!["m1", "m3"]);
    }

    #[test]
    fn test_selection_change_does_not_rederive() {
        let mut store = store();
        let before = store.derivations();
        let changes = store.dispatch(Action::SetHoveredMethod(Some("m2".into())));
        assert!(changes.needs_update());
        assert_eq!(store.derivations(), before);
    }

    #[test]
    fn test_only_filter_changes_rederive() {
        let mut store = store();
        store.dispatch(Action::SetSelectedStep(Some(Stage::Collect)));
        let after_first = store.derivations();
        store.dispatch(Action::SetSelectedStep(None));
        store.dispatch(Action::SetSelectedStep(Some(Stage::Collect)));
        assert_eq!(store.derivations(), after_first + 2);

        // A no-op transition leaves the memo alone.
        store.dispatch(Action::SetSelectedStep(Some(Stage::Collect)));
        assert_eq!(store.derivations(), after_first + 2);
    }

    #[test]
    fn test_snapshots_are_isolated_from_later_dispatches() {
        let mut store = store();
        let before = store.snapshot();
        store.dispatch(Action::SetSelectedStep(Some(Stage::Preprocess)));
        assert_eq!(ids(&before), vec!["m1", "m2", "m3"]);
        assert_eq!(ids(&store.snapshot()), vec!["m2"]);
    }

    #[test]
    fn test_failed_store_has_no_methods() {
        let err = LoadError::NotAnObject {
            path: "x.json".into(),
        };
        let store = Store::failed(err.clone());
        let snapshot = store.snapshot();
        assert_eq!(snapshot.state.load.error(), Some(&err));
        assert!(snapshot.filtered_methods().is_empty());
    }

    #[test]
    fn test_compared_methods_skip_unknown_ids() {
        let mut store = store();
        store.dispatch(Action::ToggleCompareMethod("m3".into()));
        store.dispatch(Action::ToggleCompareMethod("ghost".into()));
        store.dispatch(Action::ToggleCompareMethod("m1".into()));
        let snapshot = store.snapshot();
        let compared: Vec<&str> = snapshot
            .compared_methods()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(compared, vec!["m3", "m1"]);
    }
}
