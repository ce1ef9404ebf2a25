//! Error and warning types shared across the catalog.
//!
//! Hard failures (the dataset cannot be read at all) are [`LoadError`]s.
//! Problems inside a readable dataset are [`ValidationWarning`]s, which
//! are collected rather than raised.

pub mod collection;
pub mod reporting;
pub mod summary;

pub use collection::{ValidationWarning, WarningKind, Warnings};
pub use summary::ValidationReport;

use std::path::PathBuf;

/// Failure to obtain a dataset at all.
///
/// Cloneable so a cached failure can be handed to every reader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read dataset {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("dataset {} is not valid JSON: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("dataset {} is missing top-level key '{key}'", path.display())]
    MissingKey { path: PathBuf, key: &'static str },

    #[error("dataset {} must be a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, error: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_messages_carry_path() {
        let err = LoadError::MissingKey {
            path: PathBuf::from("data/methods.json"),
            key: "methods",
        };
        assert_eq!(
            err.to_string(),
            "dataset data/methods.json is missing top-level key 'methods'"
        );
    }

    #[test]
    fn test_io_error_keeps_raw_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let err = LoadError::io("x.json", &io);
        assert!(err.to_string().contains("No such file"));
    }
}
