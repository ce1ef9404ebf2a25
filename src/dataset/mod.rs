//! Dataset loading, validation and the process-wide catalog cache.
//!
//! A [`Catalog`] bundles the read-only dataset, its search index and the
//! validation warnings produced while loading it. All three are behind
//! `Arc`, so cloning a catalog is cheap and every reader shares one copy.

pub mod cache;
pub mod loader;
pub mod validation;

pub use cache::{shared_catalog, CatalogCache};
pub use loader::{decode_dataset, load_catalog, parse_catalog};
pub use validation::validate_document;

use crate::errors::{ValidationReport, ValidationWarning};
use crate::model::{Dataset, Method, Modality, Stage};
use crate::search::SearchIndex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded dataset plus everything derived from it once.
#[derive(Debug, Clone)]
pub struct Catalog {
    dataset: Arc<Dataset>,
    index: Arc<SearchIndex>,
    warnings: Arc<[ValidationWarning]>,
    source: PathBuf,
}

impl Catalog {
    pub fn new(dataset: Dataset, warnings: Vec<ValidationWarning>, source: PathBuf) -> Self {
        let index = SearchIndex::build(&dataset.methods);
        Self {
            dataset: Arc::new(dataset),
            index: Arc::new(index),
            warnings: warnings.into(),
            source,
        }
    }

    /// Catalog over in-memory records, with no source file.
    pub fn from_methods(methods: Vec<Method>) -> Self {
        Self::new(
            Dataset {
                methods,
                ..Dataset::default()
            },
            Vec::new(),
            PathBuf::new(),
        )
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn methods(&self) -> &[Method] {
        &self.dataset.methods
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn validation_report(&self) -> ValidationReport {
        ValidationReport::from_warnings(&self.warnings)
    }

    pub fn method(&self, id: &str) -> Option<&Method> {
        self.dataset.method(id)
    }
}

/// Count methods per pipeline stage over the full dataset.
pub fn count_by_stage(methods: &[Method]) -> BTreeMap<Stage, usize> {
    let mut counts: BTreeMap<Stage, usize> = Stage::all().iter().map(|s| (*s, 0)).collect();
    for method in methods {
        *counts.entry(method.pipeline_step).or_insert(0) += 1;
    }
    counts
}

/// Count methods per modality; a method counts once for each modality it lists.
pub fn count_by_modality(methods: &[Method]) -> BTreeMap<Modality, usize> {
    let mut counts: BTreeMap<Modality, usize> = Modality::all().iter().map(|m| (*m, 0)).collect();
    for method in methods {
        for modality in &method.modalities {
            *counts.entry(*modality).or_insert(0) += 1;
        }
    }
    counts
}
