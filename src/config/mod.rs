//! Configuration discovery and defaults.
//!
//! A `.methodscope.toml` is searched for in the working directory and up to
//! nine of its ancestors, then in the user config directory. A file that
//! fails to parse is logged and skipped.
//!
//! ```toml
//! [dataset]
//! path = "data/methods.json"
//! base_path = ""
//!
//! [explorer]
//! sort_key = "name"
//! sort_order = "asc"
//! color_mode = "modality"
//! y_axis = "maturity"
//!
//! [charts]
//! width = 960.0
//! height = 420.0
//! resize_debounce_ms = 150
//! mount_retry_ms = 40
//! mount_max_attempts = 25
//! ```

mod core;
mod loader;

pub use core::{ChartsConfig, DatasetConfig, ExplorerConfig, MethodscopeConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path, parse_config,
    user_config_path, write_default_config, CONFIG_FILE_NAME,
};

use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse {}: {message}", loader::CONFIG_FILE_NAME)]
    Parse { message: String },

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Failed to access {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("{} already exists (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Failed to serialize config: {message}")]
    Serialize { message: String },
}

static CONFIG: OnceLock<MethodscopeConfig> = OnceLock::new();

/// Get the cached configuration
pub fn get_config() -> &'static MethodscopeConfig {
    CONFIG.get_or_init(load_config)
}
