// Integration tests for loading and validating the method catalog
// These tests read the fixture catalogs under tests/data/catalog

use methodscope::dataset::{count_by_stage, load_catalog, CatalogCache};
use methodscope::errors::WarningKind;
use methodscope::model::{Modality, Stage};
use methodscope::LoadError;
use pretty_assertions::assert_eq;
use std::path::Path;

const VALID: &str = "tests/data/catalog/methods.json";
const INVALID: &str = "tests/data/catalog/invalid_methods.json";

#[test]
fn test_valid_catalog_loads_without_warnings() {
    let catalog = load_catalog(Path::new(VALID)).unwrap();

    assert_eq!(catalog.methods().len(), 6);
    assert!(catalog.warnings().is_empty(), "{:?}", catalog.warnings());
    assert!(catalog.validation_report().passed());

    let steps = catalog.dataset().ordered_steps();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0].id, Stage::Collect);
    assert_eq!(catalog.dataset().step_name(Stage::Collect), "Collect Data");

    let counts = count_by_stage(catalog.methods());
    assert_eq!(counts[&Stage::Collect], 1);
    assert_eq!(counts[&Stage::ApplyMining], 1);
}

#[test]
fn test_invalid_records_are_reported_not_fatal() {
    let catalog = load_catalog(Path::new(INVALID)).unwrap();
    let kinds: Vec<WarningKind> = catalog.warnings().iter().map(|w| w.kind).collect();

    assert!(kinds.contains(&WarningKind::MissingField), "metadata is missing");
    assert!(kinds.contains(&WarningKind::InvalidEnum));
    assert!(kinds.contains(&WarningKind::DuplicateId));
    assert!(kinds.contains(&WarningKind::SkippedRecord));
    assert!(!catalog.validation_report().passed());

    // The unknown stage record is skipped; the duplicate id is kept.
    let ids: Vec<&str> = catalog.methods().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["good", "good"]);

    // Unknown set members are dropped, known ones survive.
    assert_eq!(catalog.methods()[0].modalities, vec![Modality::Text]);
}

#[test]
fn test_warning_paths_are_json_pointers() {
    let catalog = load_catalog(Path::new(INVALID)).unwrap();
    let stage_warning = catalog
        .warnings()
        .iter()
        .find(|w| w.kind == WarningKind::InvalidEnum && w.path.ends_with("pipeline_step"))
        .expect("invalid stage warning");
    assert_eq!(stage_warning.path, "/methods/1/pipeline_step");
}

#[test]
fn test_missing_file_is_load_error() {
    let err = load_catalog(Path::new("tests/data/catalog/nope.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_cache_reuses_catalog() {
    let cache = CatalogCache::new();
    let first = cache.get_or_load(Path::new(VALID)).unwrap();
    let second = cache.get_or_load(Path::new(VALID)).unwrap();
    assert!(std::sync::Arc::ptr_eq(first.dataset(), second.dataset()));
}
