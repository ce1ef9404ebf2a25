use crate::cli::{RunSettings, ValidateFormat};
use crate::errors::reporting::report_validation_summary;
use crate::errors::{ValidationReport, ValidationWarning};
use crate::observability::{set_dataset, set_phase, RunPhase};
use anyhow::{Context, Result};
use serde::Serialize;

pub struct ValidateConfig {
    pub format: ValidateFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    methods: usize,
    passed: bool,
    warnings: &'a [ValidationWarning],
}

/// Validate the dataset. Returns whether it passed; a file that cannot be
/// loaded at all is an error.
pub fn run_validate(settings: &RunSettings, config: ValidateConfig) -> Result<bool> {
    let _phase = set_phase(RunPhase::DatasetLoading);
    let _dataset = set_dataset(&settings.data_path);

    let catalog = crate::dataset::load_catalog(&settings.data_path)
        .with_context(|| format!("Could not load {}", settings.data_path.display()))?;
    let report = catalog.validation_report();
    let source = catalog.source().display().to_string();

    match config.format {
        ValidateFormat::Text => {
            report_validation_summary(&source, catalog.methods().len(), &report);
        }
        ValidateFormat::Json => {
            println!("{}", render_json(&source, catalog.methods().len(), catalog.warnings(), &report)?);
        }
    }

    if !report.passed() {
        tracing::warn!(warnings = report.total, "Dataset failed validation");
    }
    Ok(report.passed())
}

fn render_json(
    source: &str,
    methods: usize,
    warnings: &[ValidationWarning],
    report: &ValidationReport,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        source: source.to_string(),
        methods,
        passed: report.passed(),
        warnings,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MethodscopeConfig;
    use std::io::Write;

    fn settings(contents: &str) -> (tempfile::NamedTempFile, RunSettings) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        let settings = RunSettings {
            config: MethodscopeConfig::default(),
            data_path: file.path().to_path_buf(),
            plain: true,
        };
        (file, settings)
    }

    #[test]
    fn test_clean_dataset_passes() {
        let (_file, settings) = settings(r#"{"metadata": {}, "pipeline_steps": [], "methods": []}"#);
        let passed = run_validate(&settings, ValidateConfig { format: ValidateFormat::Json }).unwrap();
        assert!(passed);
    }

    #[test]
    fn test_missing_methods_key_is_an_error() {
        let (_file, settings) = settings(r#"{"metadata": {}}"#);
        assert!(run_validate(&settings, ValidateConfig { format: ValidateFormat::Text }).is_err());
    }

    #[test]
    fn test_json_report_carries_warning_paths() {
        let warnings = vec![ValidationWarning::missing_field("/methods/0", "name")];
        let report = ValidationReport::from_warnings(&warnings);
        let json = render_json("data.json", 1, &warnings, &report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["warnings"][0]["path"], "/methods/0");
        assert_eq!(value["warnings"][0]["kind"], "MissingField");
    }
}
