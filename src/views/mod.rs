//! Page models built from store snapshots.
//!
//! These are presentation-neutral; the CLI, the terminal explorer and the
//! HTML exporter all render from them.

pub mod compare;
pub mod detail;
pub mod explorer;
pub mod route;

pub use compare::{CompareModel, CompareRow};
pub use detail::{DetailModel, MethodDetail, RelatedLink};
pub use explorer::{EmptyState, ExplorerModel, MethodRow, PageStatus};
pub use route::{parse_compare_list, Route, RouteError};
