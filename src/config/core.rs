use crate::filter::{SortKey, SortOrder, SortSpec};
use crate::viz::{ColorMode, MountPolicy, Size, YAxis};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for methodscope
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MethodscopeConfig {
    /// Where the dataset lives
    #[serde(default)]
    pub dataset: Option<DatasetConfig>,

    /// Explorer defaults (sort, chart modes)
    #[serde(default)]
    pub explorer: Option<ExplorerConfig>,

    /// Chart surface and redraw timing
    #[serde(default)]
    pub charts: Option<ChartsConfig>,
}

impl MethodscopeConfig {
    pub fn dataset(&self) -> DatasetConfig {
        self.dataset.clone().unwrap_or_default()
    }

    pub fn explorer(&self) -> ExplorerConfig {
        self.explorer.unwrap_or_default()
    }

    pub fn charts(&self) -> ChartsConfig {
        self.charts.unwrap_or_default()
    }

    /// Every section filled in, as written by `methodscope init`.
    pub fn with_all_sections() -> Self {
        Self {
            dataset: Some(DatasetConfig::default()),
            explorer: Some(ExplorerConfig::default()),
            charts: Some(ChartsConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// Dataset file, relative to `base_path` (default: data/methods.json)
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Deployment base path; also the prefix routes are resolved under
    #[serde(default)]
    pub base_path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            base_path: String::new(),
        }
    }
}

impl DatasetConfig {
    /// Dataset file location on disk.
    pub fn resolved_path(&self) -> PathBuf {
        let base = self.base_path.trim_matches('/');
        if base.is_empty() || self.path.is_absolute() {
            self.path.clone()
        } else {
            PathBuf::from(base).join(&self.path)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub sort_key: SortKey,

    #[serde(default)]
    pub sort_order: SortOrder,

    #[serde(default)]
    pub color_mode: ColorMode,

    #[serde(default)]
    pub y_axis: YAxis,
}

impl ExplorerConfig {
    pub fn sort(&self) -> SortSpec {
        SortSpec {
            key: self.sort_key,
            order: self.sort_order,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartsConfig {
    /// Default SVG width in pixels (default: 960)
    #[serde(default = "default_width")]
    pub width: f64,

    /// Default SVG height in pixels (default: 420)
    #[serde(default = "default_height")]
    pub height: f64,

    /// Quiet period before a resize rebuilds a chart (default: 150)
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    /// Delay between mount attempts on an unmeasured surface (default: 40)
    #[serde(default = "default_mount_retry_ms")]
    pub mount_retry_ms: u64,

    /// Mount attempts before giving up (default: 25)
    #[serde(default = "default_mount_max_attempts")]
    pub mount_max_attempts: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            resize_debounce_ms: default_resize_debounce_ms(),
            mount_retry_ms: default_mount_retry_ms(),
            mount_max_attempts: default_mount_max_attempts(),
        }
    }
}

impl ChartsConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn mount_policy(&self) -> MountPolicy {
        MountPolicy {
            max_attempts: self.mount_max_attempts,
            backoff_ms: self.mount_retry_ms,
        }
    }
}

// Default value functions for serde
fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/methods.json")
}

fn default_width() -> f64 {
    960.0
}

fn default_height() -> f64 {
    420.0
}

fn default_resize_debounce_ms() -> u64 {
    150
}

fn default_mount_retry_ms() -> u64 {
    40
}

fn default_mount_max_attempts() -> u32 {
    25
}
