// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod filter;
pub mod io;
pub mod model;
pub mod observability;
pub mod search;
pub mod store;
pub mod tui;
pub mod views;
pub mod viz;

// Re-export commonly used types
pub use crate::dataset::{load_catalog, parse_catalog, Catalog};
pub use crate::errors::{LoadError, ValidationReport, ValidationWarning, WarningKind};
pub use crate::filter::{FilterPatch, FilterState, SortKey, SortOrder, SortSpec};
pub use crate::model::{
    Automation, Dataset, Maturity, Method, Modality, PipelineStep, Reference, Stage, Task,
};
pub use crate::store::{Action, AppState, ChangeSet, Snapshot, Store};
pub use crate::views::{CompareModel, DetailModel, ExplorerModel, Route};
pub use crate::viz::{Chart, LandscapePlot, PipelineDiagram, RadarChart, Scene, Size};
