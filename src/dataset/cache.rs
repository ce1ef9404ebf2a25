//! Once-per-process catalog cache.
//!
//! The first successful or failed load is kept for the rest of the
//! process. A failure is never retried; a manual restart is required.

use super::{load_catalog, Catalog};
use crate::errors::LoadError;
use once_cell::sync::{Lazy, OnceCell};
use std::path::{Path, PathBuf};

static SHARED: Lazy<CatalogCache> = Lazy::new(CatalogCache::new);

/// Holds the outcome of the first load.
#[derive(Debug, Default)]
pub struct CatalogCache {
    cell: OnceCell<(PathBuf, Result<Catalog, LoadError>)>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` on first call; later calls return the cached outcome.
    ///
    /// A later call with a different path still gets the first outcome and
    /// logs a warning, since the cache holds exactly one dataset.
    pub fn get_or_load(&self, path: &Path) -> Result<Catalog, LoadError> {
        let (cached_path, outcome) = self
            .cell
            .get_or_init(|| (path.to_path_buf(), load_catalog(path)));
        if cached_path != path {
            tracing::warn!(
                requested = %path.display(),
                cached = %cached_path.display(),
                "catalog already loaded from a different path"
            );
        }
        outcome.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Process-wide catalog, loaded on first use.
pub fn shared_catalog(path: &Path) -> Result<Catalog, LoadError> {
    SHARED.get_or_load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_failure_is_cached_and_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("methods.json");
        let cache = CatalogCache::new();

        assert!(cache.get_or_load(&path).is_err());

        // Creating the file afterwards does not trigger a reload.
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"pipeline_steps": [], "methods": []}}"#).unwrap();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_success_is_shared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("methods.json");
        std::fs::write(&path, r#"{"metadata": {}, "pipeline_steps": [], "methods": []}"#).unwrap();

        let cache = CatalogCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(std::sync::Arc::ptr_eq(first.dataset(), second.dataset()));
    }
}
