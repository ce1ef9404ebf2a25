//! Structural validation of a raw dataset document.
//!
//! Works on the untyped `serde_json::Value` so that every problem in the
//! document can be reported with its JSON pointer, instead of stopping at
//! the first serde error.

use crate::errors::{ValidationWarning, Warnings};
use crate::model::{Automation, Maturity, Modality, Stage, Task};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// Fields every method record must carry.
pub const REQUIRED_METHOD_FIELDS: &[&str] = &[
    "id",
    "name",
    "pipeline_step",
    "short_description",
    "modalities",
    "tasks",
    "maturity",
    "automation",
    "evidence_type",
    "reference",
];

/// Fields every pipeline step must carry.
pub const REQUIRED_STEP_FIELDS: &[&str] = &["id", "name", "order"];

/// Validate a whole document, returning all warnings found.
pub fn validate_document(root: &Value) -> Warnings {
    let mut warnings = Warnings::new();

    let Some(object) = root.as_object() else {
        warnings.push(ValidationWarning::invalid_type("", "object"));
        return warnings;
    };

    if !object.contains_key("metadata") {
        warnings.push(ValidationWarning::missing_field("", "metadata"));
    }

    match object.get("pipeline_steps") {
        Some(Value::Array(steps)) => {
            for (i, step) in steps.iter().enumerate() {
                validate_step(step, &format!("/pipeline_steps/{}", i), &mut warnings);
            }
        }
        Some(_) => warnings.push(ValidationWarning::invalid_type("/pipeline_steps", "array")),
        None => warnings.push(ValidationWarning::missing_field("", "pipeline_steps")),
    }

    match object.get("methods") {
        Some(Value::Array(methods)) => {
            for (i, method) in methods.iter().enumerate() {
                validate_method(method, &format!("/methods/{}", i), &mut warnings);
            }
            check_duplicate_ids(methods, &mut warnings);
        }
        Some(_) => warnings.push(ValidationWarning::invalid_type("/methods", "array")),
        None => warnings.push(ValidationWarning::missing_field("", "methods")),
    }

    warnings
}

fn validate_step(step: &Value, path: &str, warnings: &mut Warnings) {
    let Some(object) = step.as_object() else {
        warnings.push(ValidationWarning::invalid_type(path, "object"));
        return;
    };

    check_required(object, REQUIRED_STEP_FIELDS, path, warnings);
    check_enum::<Stage>(object, "id", path, warnings);

    if let Some(order) = object.get("order") {
        match order.as_u64() {
            Some(n) if (1..=6).contains(&n) => {}
            _ => warnings.push(ValidationWarning::invalid_type(
                format!("{}/order", path),
                "integer between 1 and 6",
            )),
        }
    }
}

fn validate_method(method: &Value, path: &str, warnings: &mut Warnings) {
    let Some(object) = method.as_object() else {
        warnings.push(ValidationWarning::invalid_type(path, "object"));
        return;
    };

    check_required(object, REQUIRED_METHOD_FIELDS, path, warnings);
    check_enum::<Stage>(object, "pipeline_step", path, warnings);
    check_enum::<Maturity>(object, "maturity", path, warnings);
    check_enum::<Automation>(object, "automation", path, warnings);
    check_enum_array::<Modality>(object, "modalities", path, warnings);
    check_enum_array::<Task>(object, "tasks", path, warnings);

    if let Some(year) = object.get("reference").and_then(|r| r.get("year")) {
        if !year.is_null() && year.as_i64().is_none() {
            warnings.push(ValidationWarning::invalid_type(
                format!("{}/reference/year", path),
                "integer",
            ));
        }
    }
}

fn check_required(object: &Map<String, Value>, fields: &[&str], path: &str, warnings: &mut Warnings) {
    for field in fields {
        if !object.contains_key(*field) {
            warnings.push(ValidationWarning::missing_field(path, field));
        }
    }
}

fn check_enum<T>(object: &Map<String, Value>, field: &str, path: &str, warnings: &mut Warnings)
where
    T: FromStr<Err = crate::model::UnknownValue>,
{
    let Some(value) = object.get(field) else {
        return;
    };
    let field_path = format!("{}/{}", path, field);
    match value.as_str() {
        Some(s) => {
            if let Err(e) = s.parse::<T>() {
                warnings.push(ValidationWarning::invalid_enum(field_path, e.to_string()));
            }
        }
        None => warnings.push(ValidationWarning::invalid_type(field_path, "string")),
    }
}

fn check_enum_array<T>(
    object: &Map<String, Value>,
    field: &str,
    path: &str,
    warnings: &mut Warnings,
) where
    T: FromStr<Err = crate::model::UnknownValue>,
{
    let Some(value) = object.get(field) else {
        return;
    };
    let field_path = format!("{}/{}", path, field);
    let Some(items) = value.as_array() else {
        warnings.push(ValidationWarning::invalid_type(field_path, "array"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}/{}", field_path, i);
        match item.as_str() {
            Some(s) => {
                if let Err(e) = s.parse::<T>() {
                    warnings.push(ValidationWarning::invalid_enum(item_path, e.to_string()));
                }
            }
            None => warnings.push(ValidationWarning::invalid_type(item_path, "string")),
        }
    }
}

fn check_duplicate_ids(methods: &[Value], warnings: &mut Warnings) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, method) in methods.iter().enumerate() {
        let Some(id) = method.get("id").and_then(Value::as_str) else {
            continue;
        };
        match seen.get(id) {
            Some(&first) => warnings.push(ValidationWarning::duplicate_id(
                format!("/methods/{}/id", i),
                id,
                first,
            )),
            None => {
                seen.insert(id, i);
            }
        }
    }
}
