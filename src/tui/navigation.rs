//! Keyboard handling for the explorer.
//!
//! Each screen asks its pure `determine_*` function in [`actions`](super::actions)
//! which action a key means, then this module carries it out against the app.

use super::actions::{
    determine_compare_action, determine_detail_action, determine_filter_action,
    determine_list_action, determine_search_action, determine_sort_action, filter_entries,
    next_modality, CompareAction, DetailAction, FilterMenuAction, ListAction, ListActionContext,
    SearchAction, SortMenuAction,
};
use super::app::{ExplorerApp, PAGE_SIZE};
use super::view_mode::ViewMode;
use crate::filter::SortSpec;
use crate::store::Action;
use crate::viz::PipelineEvent;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::time::Instant;

/// Handle one key press. Returns true when the explorer should quit.
pub fn handle_key(app: &mut ExplorerApp, key: KeyEvent, now: Instant) -> Result<bool> {
    app.clear_status_message();

    match app.view_mode() {
        ViewMode::List => handle_list_key(app, key, now),
        ViewMode::Detail => handle_detail_key(app, key, now),
        ViewMode::Search => handle_search_key(app, key),
        ViewMode::SortMenu => handle_sort_menu_key(app, key),
        ViewMode::FilterMenu => handle_filter_menu_key(app, key),
        ViewMode::Compare => handle_compare_key(app, key),
        ViewMode::Help => {
            app.back();
            Ok(false)
        }
    }
}

fn handle_list_key(app: &mut ExplorerApp, key: KeyEvent, now: Instant) -> Result<bool> {
    let ctx = ListActionContext {
        has_items: app.has_items(),
        has_selection: app.selected_row().is_some(),
        compare_count: app.compare_count(),
    };
    let Some(action) = determine_list_action(key, ctx) else {
        return Ok(false);
    };
    execute_list_action(app, action, now)
}

fn execute_list_action(app: &mut ExplorerApp, action: ListAction, now: Instant) -> Result<bool> {
    match action {
        ListAction::Quit => return Ok(true),

        ListAction::MoveUp => app.move_selection(-1),
        ListAction::MoveDown => app.move_selection(1),
        ListAction::JumpToTop => app.move_selection(isize::MIN),
        ListAction::JumpToBottom => app.move_selection(isize::MAX),
        ListAction::PageUp => app.move_selection(-(PAGE_SIZE as isize)),
        ListAction::PageDown => app.move_selection(PAGE_SIZE as isize),

        ListAction::EnterDetail => {
            if let Some(id) = app.selected_row().map(|r| r.id.clone()) {
                app.dispatch(Action::SetSelectedMethod(Some(id)));
                app.enter(ViewMode::Detail);
            }
        }
        ListAction::EnterSearch => app.begin_search(),
        ListAction::OpenSortMenu => app.enter(ViewMode::SortMenu),
        ListAction::OpenFilterMenu => app.enter(ViewMode::FilterMenu),
        ListAction::ShowHelp => app.enter(ViewMode::Help),

        ListAction::ToggleCompare => app.toggle_compare_selected(),
        ListAction::OpenCompare => app.open_compare(now),

        ListAction::ClickStage(stage) => {
            let ui = app.snapshot().state.ui.clone();
            if let Some(action) = PipelineEvent::StageClicked(stage).to_action(&ui) {
                app.dispatch(action);
            }
        }
        ListAction::CycleModality => {
            let next = next_modality(app.snapshot().state.ui.selected_modality);
            app.dispatch(Action::SetSelectedModality(next));
        }
        ListAction::ResetFilters => {
            app.dispatch(Action::ResetFilters);
            app.set_status_message("Filters reset");
        }
    }
    Ok(false)
}

fn handle_detail_key(app: &mut ExplorerApp, key: KeyEvent, now: Instant) -> Result<bool> {
    let Some(action) = determine_detail_action(key, app.compare_count()) else {
        return Ok(false);
    };

    match action {
        DetailAction::Quit => return Ok(true),
        DetailAction::Back => {
            app.dispatch(Action::SetSelectedMethod(None));
            app.back();
        }
        DetailAction::MoveSelection(delta) => {
            app.move_selection(isize::from(delta));
            if let Some(id) = app.selected_row().map(|r| r.id.clone()) {
                app.dispatch(Action::SetSelectedMethod(Some(id)));
            }
        }
        DetailAction::ToggleCompare => app.toggle_compare_selected(),
        DetailAction::OpenCompare => app.open_compare(now),
        DetailAction::ShowHelp => app.enter(ViewMode::Help),
    }
    Ok(false)
}

fn handle_search_key(app: &mut ExplorerApp, key: KeyEvent) -> Result<bool> {
    let Some(action) = determine_search_action(key) else {
        return Ok(false);
    };

    match action {
        SearchAction::Insert(c) => {
            let mut input = app.search_input().to_string();
            input.push(c);
            app.set_search_input(input);
        }
        SearchAction::DeleteChar => {
            let mut input = app.search_input().to_string();
            if input.pop().is_some() {
                app.set_search_input(input);
            }
        }
        SearchAction::ClearInput => app.set_search_input(String::new()),
        SearchAction::Apply => app.back(),
        SearchAction::Cancel => app.cancel_search(),
    }
    Ok(false)
}

fn handle_sort_menu_key(app: &mut ExplorerApp, key: KeyEvent) -> Result<bool> {
    let Some(action) = determine_sort_action(key) else {
        return Ok(false);
    };

    let current = app.snapshot().state.selection.sort;
    match action {
        SortMenuAction::Select(key) => {
            app.dispatch(Action::SetSort(SortSpec {
                key,
                order: current.order,
            }));
            app.back();
        }
        SortMenuAction::ToggleOrder => {
            app.dispatch(Action::SetSort(SortSpec {
                key: current.key,
                order: current.order.toggled(),
            }));
        }
        SortMenuAction::Close => app.back(),
    }
    Ok(false)
}

fn handle_filter_menu_key(app: &mut ExplorerApp, key: KeyEvent) -> Result<bool> {
    let Some(action) = determine_filter_action(key) else {
        return Ok(false);
    };

    match action {
        FilterMenuAction::MoveUp => app.move_filter_cursor(-1),
        FilterMenuAction::MoveDown => app.move_filter_cursor(1),
        FilterMenuAction::Toggle => {
            if let Some(entry) = filter_entries().get(app.filter_cursor()).copied() {
                app.toggle_filter(entry);
            }
        }
        FilterMenuAction::Reset => {
            app.dispatch(Action::ResetFilters);
        }
        FilterMenuAction::Close => app.back(),
    }
    Ok(false)
}

fn handle_compare_key(app: &mut ExplorerApp, key: KeyEvent) -> Result<bool> {
    let Some(action) = determine_compare_action(key, app.compare_count()) else {
        return Ok(false);
    };

    match action {
        CompareAction::Quit => return Ok(true),
        CompareAction::Back => app.back(),
        CompareAction::Remove(index) => {
            let id = app.snapshot().state.selection.compare.get(index).cloned();
            if let Some(id) = id {
                app.dispatch(Action::ToggleCompareMethod(id));
            }
        }
        CompareAction::Clear => {
            app.dispatch(Action::ClearCompare);
        }
        CompareAction::ShowHelp => app.enter(ViewMode::Help),
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartsConfig;
    use crate::dataset::Catalog;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};
    use crate::store::Store;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut ExplorerApp, code: KeyCode) -> bool {
        handle_key(app, key(code), Instant::now()).unwrap()
    }

    fn app() -> ExplorerApp {
        let store = Store::new(Catalog::from_methods(vec![
            method("a", Stage::Collect, &[Modality::Text]),
            method("b", Stage::Preprocess, &[Modality::Image]),
            method("c", Stage::Preprocess, &[Modality::Audio]),
        ]));
        let mut app = ExplorerApp::new(store, &ChartsConfig::default());
        app.on_resize(120, 40, Instant::now());
        app
    }

    #[test]
    fn test_quit_from_list() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_enter_detail_selects_method_and_back_clears_it() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view_mode(), ViewMode::Detail);
        assert_eq!(app.detail_id(), Some("b"));
        assert_eq!(
            app.snapshot().state.selection.selected_method.as_deref(),
            Some("b")
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view_mode(), ViewMode::List);
        assert!(app.snapshot().state.selection.selected_method.is_none());
    }

    #[test]
    fn test_stage_key_toggles_stage_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.snapshot().state.ui.selected_step, Some(Stage::Preprocess));
        assert_eq!(app.item_count(), 2);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.snapshot().state.ui.selected_step, None);
        assert_eq!(app.item_count(), 3);
    }

    #[test]
    fn test_modality_cycle_clears_stage() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('m'));
        let ui = &app.snapshot().state.ui;
        assert_eq!(ui.selected_modality, Some(Modality::Text));
        assert_eq!(ui.selected_step, Some(Stage::Collect));
    }

    #[test]
    fn test_search_typing_filters_live() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.view_mode(), ViewMode::Search);
        for c in "zzz".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.item_count(), 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.item_count(), 3);
    }

    #[test]
    fn test_sort_menu_flips_order() {
        let mut app = app();
        let before = app.snapshot().state.selection.sort.order;
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.snapshot().state.selection.sort.order, before.toggled());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_compare_remove_and_clear() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.compare_count(), 2);

        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.view_mode(), ViewMode::Compare);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.snapshot().state.selection.compare, vec!["b".to_string()]);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.compare_count(), 0);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view_mode(), ViewMode::Help);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.view_mode(), ViewMode::List);
    }
}
