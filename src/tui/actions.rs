//! Pure key-to-action mapping for every screen.
//!
//! Each `determine_*` function looks only at the key and a small context
//! struct, so the whole keymap is testable without a terminal or a store.
//! [`navigation`](super::navigation) executes the returned actions.

use crate::filter::SortKey;
use crate::model::{Maturity, Modality, Stage, Task};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Quit,
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    PageUp,
    PageDown,
    EnterDetail,
    EnterSearch,
    OpenSortMenu,
    OpenFilterMenu,
    ShowHelp,
    /// Add or remove the selected method from the compare set.
    ToggleCompare,
    OpenCompare,
    /// Stage strip key; follows the pipeline card click contract.
    ClickStage(Stage),
    /// Step the data-source modality: none, text, image, ..., none.
    CycleModality,
    ResetFilters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListActionContext {
    pub has_items: bool,
    pub has_selection: bool,
    pub compare_count: usize,
}

pub fn determine_list_action(key: KeyEvent, ctx: ListActionContext) -> Option<ListAction> {
    match key.code {
        KeyCode::Char('q') => Some(ListAction::Quit),

        KeyCode::Up | KeyCode::Char('k') => Some(ListAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ListAction::MoveDown),
        KeyCode::Char('g') | KeyCode::Home => Some(ListAction::JumpToTop),
        KeyCode::Char('G') | KeyCode::End => Some(ListAction::JumpToBottom),
        KeyCode::PageUp => Some(ListAction::PageUp),
        KeyCode::PageDown => Some(ListAction::PageDown),

        KeyCode::Enter if ctx.has_items && ctx.has_selection => Some(ListAction::EnterDetail),
        KeyCode::Char('c') if ctx.has_selection => Some(ListAction::ToggleCompare),
        KeyCode::Char('C') if ctx.compare_count > 0 => Some(ListAction::OpenCompare),

        KeyCode::Char('/') => Some(ListAction::EnterSearch),
        KeyCode::Char('s') => Some(ListAction::OpenSortMenu),
        KeyCode::Char('f') => Some(ListAction::OpenFilterMenu),
        KeyCode::Char('?') => Some(ListAction::ShowHelp),
        KeyCode::Char('m') => Some(ListAction::CycleModality),
        KeyCode::Char('r') => Some(ListAction::ResetFilters),

        KeyCode::Char(c @ '1'..='6') => digit(c)
            .and_then(|n| Stage::from_order(n as u8))
            .map(ListAction::ClickStage),

        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Back,
    Quit,
    /// Step to the previous/next method without leaving the detail view.
    MoveSelection(i8),
    ToggleCompare,
    OpenCompare,
    ShowHelp,
}

pub fn determine_detail_action(key: KeyEvent, compare_count: usize) -> Option<DetailAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            Some(DetailAction::Back)
        }
        KeyCode::Char('q') => Some(DetailAction::Quit),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('n') => {
            Some(DetailAction::MoveSelection(1))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('p') => {
            Some(DetailAction::MoveSelection(-1))
        }
        KeyCode::Char('c') => Some(DetailAction::ToggleCompare),
        KeyCode::Char('C') if compare_count > 0 => Some(DetailAction::OpenCompare),
        KeyCode::Char('?') => Some(DetailAction::ShowHelp),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareAction {
    Back,
    Quit,
    /// Drop the n-th compared method (0-based).
    Remove(usize),
    Clear,
    ShowHelp,
}

pub fn determine_compare_action(key: KeyEvent, compare_count: usize) -> Option<CompareAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            Some(CompareAction::Back)
        }
        KeyCode::Char('q') => Some(CompareAction::Quit),
        KeyCode::Char('x') => Some(CompareAction::Clear),
        KeyCode::Char('?') => Some(CompareAction::ShowHelp),
        KeyCode::Char(c @ '1'..='3') => digit(c)
            .map(|n| n - 1)
            .filter(|i| *i < compare_count)
            .map(CompareAction::Remove),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Insert(char),
    DeleteChar,
    ClearInput,
    /// Keep the query and return to the list.
    Apply,
    /// Restore the query from before the search started.
    Cancel,
}

pub fn determine_search_action(key: KeyEvent) -> Option<SearchAction> {
    match key.code {
        KeyCode::Enter => Some(SearchAction::Apply),
        KeyCode::Esc => Some(SearchAction::Cancel),
        KeyCode::Backspace => Some(SearchAction::DeleteChar),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SearchAction::ClearInput)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SearchAction::Insert(c))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMenuAction {
    Select(SortKey),
    ToggleOrder,
    Close,
}

pub fn determine_sort_action(key: KeyEvent) -> Option<SortMenuAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => Some(SortMenuAction::Close),
        KeyCode::Char('o') | KeyCode::Tab => Some(SortMenuAction::ToggleOrder),
        KeyCode::Char(c @ '1'..='9') => digit(c)
            .and_then(|n| SortKey::all().get(n - 1))
            .copied()
            .map(SortMenuAction::Select),
        _ => None,
    }
}

/// A toggleable line in the filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEntry {
    Modality(Modality),
    Task(Task),
    Maturity(Maturity),
}

impl FilterEntry {
    pub fn label(&self) -> &'static str {
        match self {
            FilterEntry::Modality(m) => m.display_name(),
            FilterEntry::Task(t) => t.display_name(),
            FilterEntry::Maturity(m) => m.display_name(),
        }
    }

    pub fn group(&self) -> &'static str {
        match self {
            FilterEntry::Modality(_) => "Modality",
            FilterEntry::Task(_) => "Task",
            FilterEntry::Maturity(_) => "Maturity",
        }
    }
}

/// Filter menu lines in display order.
pub fn filter_entries() -> Vec<FilterEntry> {
    Modality::all()
        .iter()
        .copied()
        .map(FilterEntry::Modality)
        .chain(Task::all().iter().copied().map(FilterEntry::Task))
        .chain(Maturity::all().iter().copied().map(FilterEntry::Maturity))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMenuAction {
    MoveUp,
    MoveDown,
    Toggle,
    Reset,
    Close,
}

pub fn determine_filter_action(key: KeyEvent) -> Option<FilterMenuAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(FilterMenuAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(FilterMenuAction::MoveDown),
        KeyCode::Char(' ') | KeyCode::Enter => Some(FilterMenuAction::Toggle),
        KeyCode::Char('r') => Some(FilterMenuAction::Reset),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('f') => Some(FilterMenuAction::Close),
        _ => None,
    }
}

/// Next modality in the `m` cycle; wraps back to none after the last one.
pub fn next_modality(current: Option<Modality>) -> Option<Modality> {
    let all = Modality::all();
    match current {
        None => all.first().copied(),
        Some(m) => all
            .iter()
            .position(|x| *x == m)
            .and_then(|i| all.get(i + 1))
            .copied(),
    }
}

fn digit(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| d as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(has_items: bool, compare_count: usize) -> ListActionContext {
        ListActionContext {
            has_items,
            has_selection: has_items,
            compare_count,
        }
    }

    #[test]
    fn test_stage_keys_map_to_pipeline_order() {
        assert_eq!(
            determine_list_action(key(KeyCode::Char('1')), ctx(true, 0)),
            Some(ListAction::ClickStage(Stage::Collect))
        );
        assert_eq!(
            determine_list_action(key(KeyCode::Char('6')), ctx(true, 0)),
            Some(ListAction::ClickStage(Stage::ApplyMining))
        );
        assert_eq!(determine_list_action(key(KeyCode::Char('7')), ctx(true, 0)), None);
    }

    #[test]
    fn test_guarded_list_actions() {
        assert_eq!(determine_list_action(key(KeyCode::Enter), ctx(false, 0)), None);
        assert_eq!(determine_list_action(key(KeyCode::Char('c')), ctx(false, 0)), None);
        assert_eq!(determine_list_action(key(KeyCode::Char('C')), ctx(true, 0)), None);
        assert_eq!(
            determine_list_action(key(KeyCode::Char('C')), ctx(true, 2)),
            Some(ListAction::OpenCompare)
        );
    }

    #[test]
    fn test_compare_remove_is_bounded_by_set_size() {
        assert_eq!(
            determine_compare_action(key(KeyCode::Char('2')), 2),
            Some(CompareAction::Remove(1))
        );
        assert_eq!(determine_compare_action(key(KeyCode::Char('3')), 2), None);
    }

    #[test]
    fn test_search_keys() {
        assert_eq!(
            determine_search_action(key(KeyCode::Char('q'))),
            Some(SearchAction::Insert('q'))
        );
        assert_eq!(
            determine_search_action(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(SearchAction::ClearInput)
        );
        assert_eq!(determine_search_action(key(KeyCode::Esc)), Some(SearchAction::Cancel));
    }

    #[test]
    fn test_sort_menu_numbers_follow_key_order() {
        assert_eq!(
            determine_sort_action(key(KeyCode::Char('2'))),
            Some(SortMenuAction::Select(SortKey::Year))
        );
        assert_eq!(determine_sort_action(key(KeyCode::Char('9'))), None);
    }

    #[test]
    fn test_modality_cycle_wraps_to_none() {
        let mut seen = Vec::new();
        let mut current = next_modality(None);
        while let Some(m) = current {
            seen.push(m);
            current = next_modality(current);
        }
        assert_eq!(seen, Modality::all().to_vec());
    }

    #[test]
    fn test_filter_entries_cover_every_vocabulary() {
        let entries = filter_entries();
        assert_eq!(
            entries.len(),
            Modality::all().len() + Task::all().len() + Maturity::all().len()
        );
        assert_eq!(entries[0].group(), "Modality");
    }

    fn key_code_strategy() -> impl Strategy<Value = KeyCode> {
        prop_oneof![
            any::<char>().prop_map(KeyCode::Char),
            Just(KeyCode::Enter),
            Just(KeyCode::Esc),
            Just(KeyCode::Up),
            Just(KeyCode::Down),
            Just(KeyCode::Tab),
        ]
    }

    proptest! {
        #[test]
        fn quit_always_available(has_items: bool, count in 0usize..=3) {
            prop_assert_eq!(
                determine_list_action(key(KeyCode::Char('q')), ctx(has_items, count)),
                Some(ListAction::Quit)
            );
        }

        #[test]
        fn empty_list_never_enters_detail(code in key_code_strategy()) {
            let action = determine_list_action(key(code), ctx(false, 0));
            prop_assert_ne!(action, Some(ListAction::EnterDetail));
            prop_assert_ne!(action, Some(ListAction::ToggleCompare));
        }
    }
}
