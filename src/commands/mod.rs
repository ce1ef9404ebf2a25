//! Command implementations behind the CLI.
//!
//! Each submodule pairs a small `*Config` struct built from parsed arguments
//! with a `run_*` function:
//! - **list**: filtered, sorted method table or JSON
//! - **show**: one method in detail
//! - **compare**: attribute table and radar for up to three methods
//! - **render**: pipeline, landscape or radar chart as SVG
//! - **export**: static HTML pages
//! - **validate**: dataset warnings, nonzero exit when any are found
//! - **explore**: the interactive terminal explorer
//! - **init**: write a default configuration file

pub mod compare;
pub mod explore;
pub mod export;
pub mod init;
pub mod list;
pub mod render;
pub mod show;
pub mod validate;

pub use compare::{run_compare, CompareConfig};
pub use explore::run_explore;
pub use export::{run_export, ExportConfig};
pub use init::{init_config, InitConfig};
pub use list::{run_list, ListConfig};
pub use render::{run_render, RenderConfig};
pub use show::{run_show, ShowConfig};
pub use validate::{run_validate, ValidateConfig};
