//! Application state store.
//!
//! One [`Store`] owns the [`AppState`] tree. Views never assign fields
//! directly: they dispatch an [`Action`], the pure [`reduce`] function
//! computes the next state, and readers get immutable [`Snapshot`]s.

pub mod actions;
pub mod state;
#[allow(clippy::module_inception)]
pub mod store;

pub use actions::{reduce, Action};
pub use state::{AppState, ChangeSet, LoadStatus, SelectionState, UiState, MAX_COMPARE};
pub use store::{Snapshot, Store};
