//! Application state for the terminal explorer.
//!
//! The app owns the [`Store`] and a snapshot of it. Every state change goes
//! through [`ExplorerApp::dispatch`], which refreshes the snapshot and routes
//! the resulting [`ChangeSet`] to the radar binding.

use super::actions::{filter_entries, FilterEntry};
use super::view_mode::ViewMode;
use super::{compare_view, detail_view, layout, list_view};
use crate::config::ChartsConfig;
use crate::filter::FilterPatch;
use crate::store::{Action, ChangeSet, Snapshot, Store, MAX_COMPARE};
use crate::views::{ExplorerModel, MethodRow};
use crate::viz::{ChartBinding, MountStatus, RadarChart, RadarOptions, RadarUpdate, Size};
use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::Frame;
use std::collections::BTreeSet;
use std::time::Instant;

/// Rows moved by PageUp/PageDown.
pub const PAGE_SIZE: usize = 20;

pub struct ExplorerApp {
    store: Store,
    snapshot: Snapshot,
    model: ExplorerModel,
    view_mode: ViewMode,
    /// Screens to return to, most recent last.
    history: Vec<ViewMode>,
    selected_index: usize,
    scroll_offset: usize,
    search_input: String,
    search_before: String,
    filter_cursor: usize,
    status_message: Option<String>,
    radar: ChartBinding<RadarChart>,
    terminal_size: (u16, u16),
    matcher: SkimMatcherV2,
}

impl ExplorerApp {
    pub fn new(store: Store, charts: &ChartsConfig) -> Self {
        let snapshot = store.snapshot();
        let model = ExplorerModel::from_snapshot(&snapshot);
        let radar = ChartBinding::with_policy(
            RadarChart::new(),
            RadarOptions::new(snapshot.compared_methods()),
            charts.mount_policy(),
            charts.resize_debounce(),
        );
        let search_input = snapshot.state.filters.search_query.clone();
        Self {
            store,
            snapshot,
            model,
            view_mode: ViewMode::List,
            history: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            search_before: search_input.clone(),
            search_input,
            filter_cursor: 0,
            status_message: None,
            radar,
            terminal_size: (80, 24),
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Apply one store action and bring the derived views up to date.
    pub fn dispatch(&mut self, action: Action) -> ChangeSet {
        let changes = self.store.dispatch(action);
        if changes.is_empty() {
            return changes;
        }
        self.snapshot = self.store.snapshot();
        self.model = ExplorerModel::from_snapshot(&self.snapshot);
        if changes.filters || changes.sort {
            self.selected_index = 0;
            self.scroll_offset = 0;
        }
        self.set_selected_index(self.selected_index);
        self.sync_radar(&changes);
        changes
    }

    fn sync_radar(&mut self, changes: &ChangeSet) {
        let snapshot = &self.snapshot;
        let options = || RadarOptions::new(snapshot.compared_methods());
        let result = if changes.compare {
            self.radar.data_changed(options())
        } else {
            self.radar
                .apply(changes, options, || RadarUpdate {
                    highlighted: snapshot.state.selection.selected_method.clone(),
                })
                .map(|_| ())
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Radar redraw failed");
            self.status_message = Some(format!("Radar unavailable: {}", e));
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.terminal_size = (area.width, area.height);

        match self.view_mode {
            ViewMode::List => list_view::render(frame, self),
            ViewMode::Search => list_view::render_with_search(frame, self),
            ViewMode::SortMenu => list_view::render_with_sort_menu(frame, self),
            ViewMode::FilterMenu => list_view::render_with_filter_menu(frame, self),
            ViewMode::Detail => detail_view::render(frame, self),
            ViewMode::Compare => compare_view::render(frame, self),
            ViewMode::Help => layout::render_help_overlay(frame, self),
        }
    }

    // Data access

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn model(&self) -> &ExplorerModel {
        &self.model
    }

    pub fn rows(&self) -> &[MethodRow] {
        &self.model.rows
    }

    pub fn item_count(&self) -> usize {
        self.model.rows.len()
    }

    pub fn has_items(&self) -> bool {
        !self.model.rows.is_empty()
    }

    pub fn selected_row(&self) -> Option<&MethodRow> {
        self.model.rows.get(self.selected_index)
    }

    /// Method shown by the detail view: the store's selected method, else
    /// the list selection.
    pub fn detail_id(&self) -> Option<&str> {
        self.snapshot
            .state
            .selection
            .selected_method
            .as_deref()
            .or_else(|| self.selected_row().map(|r| r.id.as_str()))
    }

    pub fn compare_count(&self) -> usize {
        self.snapshot.state.selection.compare.len()
    }

    pub fn matcher(&self) -> &SkimMatcherV2 {
        &self.matcher
    }

    pub fn radar(&self) -> &ChartBinding<RadarChart> {
        &self.radar
    }

    // List position

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn set_selected_index(&mut self, index: usize) {
        self.selected_index = match self.item_count() {
            0 => 0,
            count => index.min(count - 1),
        };
    }

    pub fn move_selection(&mut self, delta: isize) {
        let next = self.selected_index.saturating_add_signed(delta);
        self.set_selected_index(next);
        self.adjust_scroll();
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keep the selection inside the visible window.
    pub fn adjust_scroll(&mut self) {
        let visible = self.visible_rows().max(1);
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index + 1 - visible;
        }
    }

    /// List rows that fit below the header and stage strip.
    pub fn visible_rows(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(list_view::CHROME_HEIGHT))
    }

    // View modes

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch screens, remembering the current one for [`back`](Self::back).
    pub fn enter(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        self.history.push(self.view_mode);
        self.view_mode = mode;
    }

    /// The screen an overlay is drawn on top of.
    pub fn underlying_view(&self) -> ViewMode {
        self.history
            .iter()
            .rev()
            .copied()
            .find(|m| !m.is_overlay())
            .unwrap_or(ViewMode::List)
    }

    /// Return to the previous screen. Leaving the compare view releases the
    /// radar surface.
    pub fn back(&mut self) {
        if self.view_mode == ViewMode::Compare {
            self.radar.unmount();
        }
        self.view_mode = self.history.pop().unwrap_or(ViewMode::List);
    }

    // Search

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn begin_search(&mut self) {
        self.search_before = self.snapshot.state.filters.search_query.clone();
        self.search_input = self.search_before.clone();
        self.enter(ViewMode::Search);
    }

    /// Replace the search input; the list follows as the user types.
    pub fn set_search_input(&mut self, input: String) {
        self.search_input = input;
        self.dispatch(Action::SetFilters(
            FilterPatch::new().search_query(self.search_input.clone()),
        ));
    }

    pub fn cancel_search(&mut self) {
        let before = self.search_before.clone();
        self.set_search_input(before);
        self.back();
    }

    // Filters

    pub fn filter_cursor(&self) -> usize {
        self.filter_cursor
    }

    pub fn move_filter_cursor(&mut self, delta: isize) {
        let count = filter_entries().len();
        self.filter_cursor = self
            .filter_cursor
            .saturating_add_signed(delta)
            .min(count.saturating_sub(1));
    }

    pub fn is_filter_active(&self, entry: FilterEntry) -> bool {
        let filters = &self.snapshot.state.filters;
        match entry {
            FilterEntry::Modality(m) => filters.modalities.contains(&m),
            FilterEntry::Task(t) => filters.tasks.contains(&t),
            FilterEntry::Maturity(m) => filters.maturity.contains(&m),
        }
    }

    pub fn toggle_filter(&mut self, entry: FilterEntry) {
        let filters = &self.snapshot.state.filters;
        let patch = match entry {
            FilterEntry::Modality(m) => FilterPatch::new().modalities(toggled(&filters.modalities, m)),
            FilterEntry::Task(t) => FilterPatch::new().tasks(toggled(&filters.tasks, t)),
            FilterEntry::Maturity(m) => FilterPatch::new().maturity(toggled(&filters.maturity, m)),
        };
        self.dispatch(Action::SetFilters(patch));
    }

    // Compare

    pub fn toggle_compare_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let id = row.id.clone();
        let name = row.name.clone();
        let was_compared = row.compared;
        if !was_compared && self.compare_count() >= MAX_COMPARE {
            self.status_message = Some(format!(
                "Compare holds at most {} methods; remove one first",
                MAX_COMPARE
            ));
            return;
        }
        self.dispatch(Action::ToggleCompareMethod(id));
        self.status_message = Some(if was_compared {
            format!("Removed {} from compare", name)
        } else {
            format!("Added {} to compare", name)
        });
    }

    pub fn open_compare(&mut self, now: Instant) {
        self.enter(ViewMode::Compare);
        self.mount_radar(now);
    }

    /// Radar drawing surface for the current terminal size.
    pub fn radar_surface(&self) -> Size {
        compare_view::surface_size(self.terminal_size)
    }

    fn mount_radar(&mut self, now: Instant) {
        match self.radar.mount(self.radar_surface(), now) {
            Ok(MountStatus::Failed) | Err(_) => {
                self.status_message = Some("Terminal too small to draw the radar".to_string());
            }
            Ok(_) => {}
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16, now: Instant) {
        self.terminal_size = (width, height);
        self.adjust_scroll();
        self.radar.on_resize(self.radar_surface(), now);
    }

    /// Run time-based work: debounced resizes and pending mount retries.
    pub fn tick(&mut self, now: Instant) {
        if let Err(e) = self.radar.poll(now) {
            tracing::warn!(error = %e, "Radar resize failed");
        }
        let retry_due = self.view_mode == ViewMode::Compare
            && matches!(self.radar.status(), Some(MountStatus::Retry { .. }))
            && self.radar.next_attempt().is_some_and(|at| now >= at);
        if retry_due {
            self.mount_radar(now);
        }
    }

    // Status line

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

fn toggled<T: Ord + Copy>(set: &BTreeSet<T>, value: T) -> BTreeSet<T> {
    let mut next = set.clone();
    if !next.remove(&value) {
        next.insert(value);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Catalog;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};
    use std::time::Duration;

    fn app() -> ExplorerApp {
        let store = Store::new(Catalog::from_methods(vec![
            method("a", Stage::Collect, &[Modality::Text]),
            method("b", Stage::Preprocess, &[Modality::Image]),
            method("c", Stage::Preprocess, &[Modality::Audio]),
            method("d", Stage::ApplyMining, &[Modality::Video]),
        ]));
        let mut app = ExplorerApp::new(store, &ChartsConfig::default());
        app.on_resize(120, 40, Instant::now());
        app
    }

    #[test]
    fn test_filter_change_resets_selection() {
        let mut app = app();
        app.move_selection(2);
        assert_eq!(app.selected_index(), 2);
        app.dispatch(Action::SetSelectedStep(Some(Stage::Preprocess)));
        assert_eq!(app.selected_index(), 0);
        assert_eq!(app.item_count(), 2);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app();
        app.move_selection(100);
        assert_eq!(app.selected_index(), 3);
        app.move_selection(-100);
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn test_compare_set_rejects_fourth() {
        let mut app = app();
        for i in 0..4 {
            app.set_selected_index(i);
            app.toggle_compare_selected();
        }
        assert_eq!(app.compare_count(), 3);
        assert!(app.status_message().is_some_and(|m| m.contains("at most 3")));
    }

    #[test]
    fn test_compare_view_mounts_and_rebuilds_on_compare_change() {
        let mut app = app();
        app.set_selected_index(0);
        app.toggle_compare_selected();
        app.set_selected_index(1);
        app.toggle_compare_selected();

        let now = Instant::now();
        app.open_compare(now);
        assert!(app.radar().is_mounted());
        let renders = app.radar().render_count();

        app.dispatch(Action::ClearCompare);
        assert_eq!(app.radar().render_count(), renders + 1);

        app.back();
        assert_eq!(app.view_mode(), ViewMode::List);
        assert!(!app.radar().is_mounted());
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut app = app();
        let now = Instant::now();
        app.open_compare(now);
        let renders = app.radar().render_count();

        app.on_resize(100, 30, now);
        app.tick(now + Duration::from_millis(10));
        assert_eq!(app.radar().render_count(), renders);
        app.tick(now + Duration::from_millis(500));
        assert_eq!(app.radar().render_count(), renders + 1);
    }

    #[test]
    fn test_search_cancel_restores_query() {
        let mut app = app();
        app.begin_search();
        app.set_search_input("zzzz".into());
        assert_eq!(app.item_count(), 0);
        app.cancel_search();
        assert_eq!(app.item_count(), 4);
        assert_eq!(app.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_toggle_filter_entry() {
        let mut app = app();
        let entry = FilterEntry::Modality(Modality::Audio);
        app.toggle_filter(entry);
        assert!(app.is_filter_active(entry));
        assert_eq!(app.item_count(), 1);
        app.toggle_filter(entry);
        assert!(!app.is_filter_active(entry));
    }

    #[test]
    fn test_overlay_returns_to_detail() {
        let mut app = app();
        app.enter(ViewMode::Detail);
        app.enter(ViewMode::Help);
        app.back();
        assert_eq!(app.view_mode(), ViewMode::Detail);
        app.back();
        assert_eq!(app.view_mode(), ViewMode::List);
    }
}
