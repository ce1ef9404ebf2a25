//! Screens of the terminal explorer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Method list with the stage strip.
    List,
    /// Full record of the selected method.
    Detail,
    /// Search input over the list.
    Search,
    SortMenu,
    FilterMenu,
    /// Side-by-side table and radar for the compare set.
    Compare,
    Help,
}

impl ViewMode {
    /// Overlays draw on top of the list instead of replacing it.
    pub fn is_overlay(&self) -> bool {
        matches!(
            self,
            ViewMode::Search | ViewMode::SortMenu | ViewMode::FilterMenu | ViewMode::Help
        )
    }
}
