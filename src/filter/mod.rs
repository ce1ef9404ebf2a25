//! Filter, search composition and sorting over the method list.

pub mod engine;
pub mod sort;
pub mod state;

pub use engine::{apply_filters_and_search, filter_positions, matches_filters, MethodHit, ScoredPosition};
pub use sort::{collate, sort_methods, SortKey, SortOrder, SortSpec};
pub use state::{FilterPatch, FilterState, YearRange};
