// Integration tests for the explorer state flow
// Each test drives the store with actions the way the explorer does and
// checks the derived list, selection and page models.

use methodscope::dataset::load_catalog;
use methodscope::filter::{FilterPatch, SortKey, SortOrder, SortSpec};
use methodscope::model::{Maturity, Modality, Stage};
use methodscope::store::{Action, Store, MAX_COMPARE};
use methodscope::views::{CompareModel, DetailModel, EmptyState, ExplorerModel, Route};
use methodscope::viz::PipelineEvent;
use pretty_assertions::assert_eq;
use std::path::Path;

fn store() -> Store {
    Store::new(load_catalog(Path::new("tests/data/catalog/methods.json")).unwrap())
}

fn visible_ids(store: &Store) -> Vec<String> {
    ExplorerModel::from_snapshot(&store.snapshot())
        .rows
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn test_search_ranks_best_match_first() {
    let mut store = store();
    store.dispatch(Action::SetFilters(FilterPatch::new().search_query("ocr")));
    store.dispatch(Action::SetSort(SortSpec {
        key: SortKey::Relevance,
        order: SortOrder::Asc,
    }));

    let ids = visible_ids(&store);
    assert_eq!(ids.first().map(String::as_str), Some("ocr-forms"));
}

#[test]
fn test_single_character_query_does_not_filter() {
    let mut store = store();
    store.dispatch(Action::SetFilters(FilterPatch::new().search_query("x")));
    assert_eq!(visible_ids(&store).len(), 6);
}

#[test]
fn test_filters_combine_across_categories() {
    let mut store = store();
    store.dispatch(Action::SetFilters(
        FilterPatch::new()
            .maturity([Maturity::Mature, Maturity::Emerging])
            .modalities([Modality::Text, Modality::Video]),
    ));
    assert_eq!(visible_ids(&store), vec!["inductive-miner", "video-activity"]);

    store.dispatch(Action::SetFilters(FilterPatch::new().year_range(Some(2020), None)));
    assert_eq!(visible_ids(&store), vec!["video-activity"]);
}

#[test]
fn test_year_sort_descending() {
    let mut store = store();
    store.dispatch(Action::SetSort(SortSpec {
        key: SortKey::Year,
        order: SortOrder::Desc,
    }));
    let ids = visible_ids(&store);
    assert_eq!(ids[0], "sensor-correlation");
    assert_eq!(ids[1], "video-activity");
}

#[test]
fn test_reset_filters_keeps_sort_and_compare() {
    let mut store = store();
    let sort = SortSpec {
        key: SortKey::Maturity,
        order: SortOrder::Desc,
    };
    store.dispatch(Action::SetSort(sort));
    store.dispatch(Action::ToggleCompareMethod("ocr-forms".into()));
    store.dispatch(Action::SetSelectedStep(Some(Stage::Preprocess)));
    assert_eq!(visible_ids(&store), vec!["ocr-forms"]);

    let changes = store.dispatch(Action::ResetFilters);
    assert!(changes.needs_recreate());
    assert_eq!(visible_ids(&store).len(), 6);
    assert_eq!(store.state().selection.sort, sort);
    assert_eq!(store.state().selection.compare, vec!["ocr-forms".to_string()]);
}

#[test]
fn test_selection_change_does_not_rederive_list() {
    let mut store = store();
    let before = store.derivations();
    let changes = store.dispatch(Action::SetSelectedMethod(Some("ocr-forms".into())));
    assert!(!changes.needs_recreate());
    assert!(changes.needs_update());
    assert_eq!(store.derivations(), before);
}

#[test]
fn test_pipeline_clicks_follow_click_contract() {
    let mut store = store();
    let click = |store: &mut Store, event: PipelineEvent| {
        let ui = store.state().ui.clone();
        if let Some(action) = event.to_action(&ui) {
            store.dispatch(action);
        }
    };

    click(&mut store, PipelineEvent::SourceClicked(Modality::Audio));
    assert_eq!(store.state().ui.selected_step, Some(Stage::Collect));
    assert_eq!(visible_ids(&store), vec!["speech-to-text"]);

    // Collect while a source is active keeps collect and drops the source.
    click(&mut store, PipelineEvent::StageClicked(Stage::Collect));
    assert_eq!(store.state().ui.selected_step, Some(Stage::Collect));
    assert_eq!(store.state().ui.selected_modality, None);

    // A second click on the sole active stage clears it.
    click(&mut store, PipelineEvent::StageClicked(Stage::Collect));
    assert_eq!(store.state().ui.selected_step, None);
    assert_eq!(visible_ids(&store).len(), 6);
}

#[test]
fn test_compare_set_is_capped() {
    let mut store = store();
    for id in ["speech-to-text", "ocr-forms", "video-activity", "inductive-miner"] {
        store.dispatch(Action::ToggleCompareMethod(id.into()));
    }
    assert_eq!(store.state().selection.compare.len(), MAX_COMPARE);

    let snapshot = store.snapshot();
    let model = CompareModel::from_snapshot(&snapshot);
    assert!(model.is_drawable());
    assert_eq!(
        model.share_route(),
        Route::Compare(vec![
            "speech-to-text".into(),
            "ocr-forms".into(),
            "video-activity".into()
        ])
    );

    store.dispatch(Action::ToggleCompareMethod("ocr-forms".into()));
    assert_eq!(store.state().selection.compare.len(), 2);
}

#[test]
fn test_compare_link_with_unknown_ids() {
    let store = store();
    let snapshot = store.snapshot();
    let Route::Compare(ids) = Route::parse("/compare?methods=ocr-forms,ghost", "").unwrap() else {
        panic!("expected compare route");
    };
    let model = CompareModel::from_ids(&snapshot, &ids);
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.missing, vec!["ghost".to_string()]);
    assert!(!model.is_drawable());
}

#[test]
fn test_detail_resolves_related_methods() {
    let store = store();
    let snapshot = store.snapshot();
    let DetailModel::Found(detail) = DetailModel::from_snapshot(&snapshot, "speech-to-text") else {
        panic!("expected detail");
    };
    assert_eq!(detail.paper_link(), Some("10.1000/asr.2019"));
    let resolved: Vec<bool> = detail.related.iter().map(|r| r.is_resolved()).collect();
    assert_eq!(resolved, vec![true, false]);

    assert!(matches!(
        DetailModel::from_snapshot(&snapshot, "ghost"),
        DetailModel::NotFound { .. }
    ));
}

#[test]
fn test_empty_state_when_nothing_matches() {
    let mut store = store();
    store.dispatch(Action::SetFilters(FilterPatch::new().search_query("qqqqzzzz")));
    let model = ExplorerModel::from_snapshot(&store.snapshot());
    assert!(model.rows.is_empty());
    assert!(matches!(model.empty, Some(EmptyState::NoMatches { .. })));
    assert_eq!(model.summary(), "Showing 0 of 6 methods");
}
