//! Validation warning collection for dataset loads.
//!
//! Dataset problems never stop a load. Each problem is recorded as a
//! [`ValidationWarning`] keyed by the JSON pointer of the offending value,
//! and the whole list travels with the loaded catalog.

use serde::Serialize;
use std::fmt;

/// Kind of problem found in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WarningKind {
    MissingField,
    InvalidEnum,
    InvalidType,
    DuplicateId,
    SkippedRecord,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "Missing field",
            Self::InvalidEnum => "Invalid enum value",
            Self::InvalidType => "Invalid type",
            Self::DuplicateId => "Duplicate id",
            Self::SkippedRecord => "Skipped record",
        }
    }
}

/// One non-fatal problem in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// JSON pointer of the offending value, e.g. `/methods/3/pipeline_step`.
    pub path: String,
    pub kind: WarningKind,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>, field: &str) -> Self {
        Self::new(
            path,
            WarningKind::MissingField,
            format!("missing required field '{}'", field),
        )
    }

    pub fn invalid_enum(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, WarningKind::InvalidEnum, message)
    }

    pub fn invalid_type(path: impl Into<String>, expected: &str) -> Self {
        Self::new(
            path,
            WarningKind::InvalidType,
            format!("expected {}", expected),
        )
    }

    pub fn duplicate_id(path: impl Into<String>, id: &str, first_index: usize) -> Self {
        Self::new(
            path,
            WarningKind::DuplicateId,
            format!("id '{}' already used by /methods/{}", id, first_index),
        )
    }

    pub fn skipped(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(path, WarningKind::SkippedRecord, reason)
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Accumulates warnings while walking a document.
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    items: Vec<ValidationWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: ValidationWarning) {
        self.items.push(warning);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = ValidationWarning>) {
        self.items.extend(other);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationWarning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationWarning> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_includes_path() {
        let w = ValidationWarning::missing_field("/methods/2", "name");
        assert_eq!(w.to_string(), "/methods/2: missing required field 'name'");
        assert_eq!(w.kind, WarningKind::MissingField);
    }

    #[test]
    fn test_duplicate_id_message() {
        let w = ValidationWarning::duplicate_id("/methods/4/id", "ocr", 1);
        assert_eq!(w.message, "id 'ocr' already used by /methods/1");
    }

    #[test]
    fn test_warnings_accumulate_in_order() {
        let mut warnings = Warnings::new();
        assert!(warnings.is_empty());
        warnings.push(ValidationWarning::invalid_type("/methods", "array"));
        warnings.extend([ValidationWarning::skipped("/methods/0", "bad stage")]);
        assert_eq!(warnings.len(), 2);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::InvalidType, WarningKind::SkippedRecord]);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(WarningKind::DuplicateId.as_str(), "Duplicate id");
        assert_eq!(WarningKind::InvalidEnum.as_str(), "Invalid enum value");
    }
}
