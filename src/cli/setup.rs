//! Runtime setup shared by every command: logging, colors, config and the
//! dataset-backed store.

use crate::config::{self, MethodscopeConfig};
use crate::dataset::{shared_catalog, Catalog};
use crate::errors::reporting::report_brief_summary;
use crate::errors::LoadError;
use crate::observability::{self, set_dataset, set_phase, RunPhase};
use crate::store::{Action, Store};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: MethodscopeConfig,
    pub data_path: PathBuf,
    pub plain: bool,
}

impl RunSettings {
    pub fn base_path(&self) -> &str {
        self.config
            .dataset
            .as_ref()
            .map(|d| d.base_path.as_str())
            .unwrap_or("")
    }
}

/// Logging and color setup. Call once, before any output.
pub fn init_runtime(verbosity: u8, plain: bool) {
    observability::init_tracing(verbosity);
    if plain {
        colored::control::set_override(false);
    }
}

/// Explicit `--config` wins; otherwise the discovered config.
pub fn resolve_config(explicit: Option<&Path>) -> Result<MethodscopeConfig> {
    let _phase = set_phase(RunPhase::ConfigLoading);
    match explicit {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::get_config().clone()),
    }
}

/// `--data` wins over `[dataset] path`.
pub fn resolve_settings(
    data: Option<PathBuf>,
    config_path: Option<&Path>,
    plain: bool,
) -> Result<RunSettings> {
    let config = resolve_config(config_path)?;
    let data_path = data.unwrap_or_else(|| config.dataset().resolved_path());
    tracing::debug!(data = %data_path.display(), "Resolved dataset path");
    Ok(RunSettings {
        config,
        data_path,
        plain,
    })
}

/// Load (or fetch the cached) catalog for these settings.
pub fn load_catalog(settings: &RunSettings) -> Result<Catalog, LoadError> {
    let _phase = set_phase(RunPhase::DatasetLoading);
    let _dataset = set_dataset(&settings.data_path);
    shared_catalog(&settings.data_path)
}

/// A store over the dataset, seeded with the configured sort.
///
/// A load failure does not abort here: the store records it and every view
/// renders the error state.
pub fn build_store(settings: &RunSettings) -> Store {
    let mut store = Store::from_load(load_catalog(settings));
    store.dispatch(Action::SetSort(settings.config.explorer().sort()));
    store
}

/// Like [`build_store`], but a failed load is an error.
pub fn require_store(settings: &RunSettings) -> Result<Store> {
    let store = build_store(settings);
    if let Some(err) = store.state().load.error() {
        return Err(anyhow::Error::new(err.clone()).context("Could not load the method catalog"));
    }
    if let Some(catalog) = store.catalog() {
        report_brief_summary(&catalog.validation_report());
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;
    use crate::filter::{SortKey, SortOrder};
    use std::io::Write;

    fn settings(data_path: PathBuf) -> RunSettings {
        RunSettings {
            config: MethodscopeConfig {
                explorer: Some(ExplorerConfig {
                    sort_key: SortKey::Year,
                    sort_order: SortOrder::Desc,
                    ..Default::default()
                }),
                ..Default::default()
            },
            data_path,
            plain: true,
        }
    }

    #[test]
    fn test_explicit_data_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("c.toml");
        std::fs::write(&config_path, "[dataset]\npath = \"from-config.json\"\n").unwrap();

        let resolved =
            resolve_settings(Some(PathBuf::from("cli.json")), Some(&config_path), true).unwrap();
        assert_eq!(resolved.data_path, PathBuf::from("cli.json"));

        let resolved = resolve_settings(None, Some(&config_path), true).unwrap();
        assert_eq!(resolved.data_path, PathBuf::from("from-config.json"));
    }

    #[test]
    fn test_configured_sort_seeds_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"metadata": {{}}, "pipeline_steps": [], "methods": []}}"#).unwrap();
        let store = Store::from_load(crate::dataset::load_catalog(file.path()));
        assert!(store.state().load.is_ready());

        let mut seeded = store;
        seeded.dispatch(Action::SetSort(settings(file.path().to_path_buf()).config.explorer().sort()));
        assert_eq!(seeded.state().selection.sort.key, SortKey::Year);
    }
}
