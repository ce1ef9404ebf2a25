//! Reading and decoding the dataset file.

use super::validation::validate_document;
use super::Catalog;
use crate::errors::{LoadError, ValidationWarning, Warnings};
use crate::model::{Dataset, DatasetMetadata, Method, Modality, PipelineStep, Task};
use chrono::DateTime;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, info_span, warn};

/// Read, validate and index the dataset at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let _span = info_span!("load_catalog", path = %path.display()).entered();

    let contents = fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
    parse_catalog(&contents, path)
}

/// Build a catalog from already-read file contents.
pub fn parse_catalog(contents: &str, source: &Path) -> Result<Catalog, LoadError> {
    let root: Value = serde_json::from_str(contents).map_err(|e| LoadError::parse(source, &e))?;
    let object = root.as_object().ok_or_else(|| LoadError::NotAnObject {
        path: source.to_path_buf(),
    })?;
    if !object.contains_key("methods") {
        return Err(LoadError::MissingKey {
            path: source.to_path_buf(),
            key: "methods",
        });
    }

    let mut warnings = validate_document(&root);
    let (dataset, decode_warnings) = decode_dataset(&root);
    warnings.extend(decode_warnings.into_vec());

    for warning in warnings.iter() {
        warn!(path = %warning.path, kind = ?warning.kind, "{}", warning.message);
    }
    info!(
        methods = dataset.methods.len(),
        warnings = warnings.len(),
        "dataset loaded"
    );

    Ok(Catalog::new(dataset, warnings.into_vec(), source.to_path_buf()))
}

/// Decode a document into typed records, skipping what cannot be typed.
///
/// Unknown modality and task members are dropped from their sets and
/// malformed optional fields fall back to their defaults. Only records whose
/// id, stage, maturity or automation cannot be decoded are skipped.
pub fn decode_dataset(root: &Value) -> (Dataset, Warnings) {
    let mut warnings = Warnings::new();

    let metadata = root
        .get("metadata")
        .cloned()
        .and_then(|m| serde_json::from_value::<DatasetMetadata>(m).ok())
        .unwrap_or_default();

    let pipeline_steps = root
        .get("pipeline_steps")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .enumerate()
                .filter_map(|(i, step)| {
                    decode_record::<PipelineStep>(step.clone(), &format!("/pipeline_steps/{}", i))
                        .map_err(|w| warnings.push(w))
                        .ok()
                })
                .collect()
        })
        .unwrap_or_default();

    let methods = root
        .get("methods")
        .and_then(Value::as_array)
        .map(|methods| {
            methods
                .iter()
                .enumerate()
                .filter_map(|(i, method)| {
                    let path = format!("/methods/{}", i);
                    let method = normalize_method(method, &path, &mut warnings);
                    decode_record::<Method>(method, &path)
                        .map_err(|w| warnings.push(w))
                        .ok()
                })
                .collect()
        })
        .unwrap_or_default();

    (
        Dataset {
            metadata,
            pipeline_steps,
            methods,
        },
        warnings,
    )
}

fn decode_record<T: serde::de::DeserializeOwned>(
    value: Value,
    path: &str,
) -> Result<T, ValidationWarning> {
    serde_json::from_value(value).map_err(|e| {
        debug!(path, error = %e, "record skipped");
        ValidationWarning::skipped(path, format!("record skipped: {}", e))
    })
}

/// Free-text fields that default to empty when malformed.
const TEXT_FIELDS: &[&str] = &[
    "short_description",
    "description",
    "algorithm_summary",
    "evidence_type",
];

/// String lists that keep only their string members.
const LIST_FIELDS: &[&str] = &["inputs", "outputs", "related_methods", "tags"];

const TIMESTAMP_FIELDS: &[&str] = &["created_at", "updated_at"];

/// Repair what can be repaired so the record is used as-is.
///
/// Problems already reported by validation (missing fields, enum members,
/// the reference year) are fixed silently; anything else is warned here.
fn normalize_method(method: &Value, path: &str, warnings: &mut Warnings) -> Value {
    let mut method = method.clone();
    let Some(object) = method.as_object_mut() else {
        return method;
    };

    retain_known::<Modality>(object, "modalities");
    retain_known::<Task>(object, "tasks");

    if !object.get("name").is_some_and(Value::is_string) {
        if object.contains_key("name") {
            warnings.push(ValidationWarning::invalid_type(format!("{}/name", path), "string"));
        }
        if let Some(id) = object.get("id").filter(|id| id.is_string()).cloned() {
            object.insert("name".to_string(), id);
        }
    }

    for field in TEXT_FIELDS {
        drop_unless(object, field, path, "string", Value::is_string, warnings);
    }
    for field in LIST_FIELDS {
        keep_strings(object, field, path, warnings);
    }
    for field in TIMESTAMP_FIELDS {
        drop_unless(object, field, path, "RFC 3339 timestamp", is_timestamp, warnings);
    }

    let reference_path = format!("{}/reference", path);
    drop_unless(object, "reference", path, "object", Value::is_object, warnings);
    if let Some(Value::Object(reference)) = object.get_mut("reference") {
        let year_ok = reference
            .get("year")
            .is_none_or(|y| y.is_null() || y.as_i64().and_then(|y| i32::try_from(y).ok()).is_some());
        if !year_ok {
            reference.remove("year");
        }
        for field in ["venue", "title", "doi", "url"] {
            drop_unless(reference, field, &reference_path, "string", is_optional_string, warnings);
        }
        keep_strings(reference, "authors", &reference_path, warnings);
    }

    let artifacts_path = format!("{}/artifacts", path);
    drop_unless(object, "artifacts", path, "object", Value::is_object, warnings);
    if let Some(Value::Object(artifacts)) = object.get_mut("artifacts") {
        for field in ["code", "dataset", "demo"] {
            drop_unless(artifacts, field, &artifacts_path, "string", is_optional_string, warnings);
        }
    }

    method
}

/// Remove `field` when present and failing `valid`, warning about it.
fn drop_unless(
    object: &mut Map<String, Value>,
    field: &str,
    path: &str,
    expected: &str,
    valid: fn(&Value) -> bool,
    warnings: &mut Warnings,
) {
    if object.get(field).is_some_and(|value| !valid(value)) {
        object.remove(field);
        warnings.push(ValidationWarning::invalid_type(format!("{}/{}", path, field), expected));
    }
}

fn keep_strings(object: &mut Map<String, Value>, field: &str, path: &str, warnings: &mut Warnings) {
    match object.get_mut(field) {
        Some(Value::Array(items)) => {
            let before = items.len();
            items.retain(Value::is_string);
            if items.len() != before {
                warnings.push(ValidationWarning::invalid_type(
                    format!("{}/{}", path, field),
                    "array of strings",
                ));
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => {
            object.remove(field);
            warnings.push(ValidationWarning::invalid_type(format!("{}/{}", path, field), "array"));
        }
    }
}

fn is_optional_string(value: &Value) -> bool {
    value.is_null() || value.is_string()
}

fn is_timestamp(value: &Value) -> bool {
    value.is_null()
        || value
            .as_str()
            .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
}

fn retain_known<T: FromStr>(object: &mut Map<String, Value>, field: &str) {
    match object.get_mut(field) {
        Some(Value::Array(items)) => {
            items.retain(|item| item.as_str().is_some_and(|s| T::from_str(s).is_ok()));
        }
        Some(_) => {
            object.remove(field);
        }
        None => {}
    }
}
