//! CLI module for methodscope
//!
//! - Argument parsing (`args`)
//! - Runtime setup: logging, config, dataset store (`setup`)

pub mod args;
pub mod setup;

pub use args::{ChartKind, Cli, Commands, FilterArgs, ListFormat, ValidateFormat};
pub use setup::{build_store, init_runtime, require_store, resolve_settings, RunSettings};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
