//! Summary of validation warnings for reporting.

use super::collection::{ValidationWarning, WarningKind};
use std::collections::BTreeMap;

/// Maximum number of warnings shown per kind in a report.
const SAMPLES_PER_KIND: usize = 5;

/// Grouped view over a list of warnings.
#[derive(Debug)]
pub struct ValidationReport {
    pub total: usize,
    pub by_kind: BTreeMap<WarningKind, Vec<ValidationWarning>>,
}

impl ValidationReport {
    pub fn from_warnings(warnings: &[ValidationWarning]) -> Self {
        let mut by_kind: BTreeMap<WarningKind, Vec<ValidationWarning>> = BTreeMap::new();
        for warning in warnings {
            by_kind.entry(warning.kind).or_default().push(warning.clone());
        }

        Self {
            total: warnings.len(),
            by_kind,
        }
    }

    pub fn passed(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Plain-text breakdown, one section per warning kind.
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("\nWarning breakdown:\n");
        for (kind, warnings) in &self.by_kind {
            report.push_str(&format!("  {}: {}\n", kind.as_str(), warnings.len()));

            for warning in warnings.iter().take(SAMPLES_PER_KIND) {
                report.push_str(&format!("    - {}\n", warning));
            }

            if warnings.len() > SAMPLES_PER_KIND {
                report.push_str(&format!(
                    "    ... and {} more\n",
                    warnings.len() - SAMPLES_PER_KIND
                ));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ValidationWarning> {
        vec![
            ValidationWarning::missing_field("/methods/0", "name"),
            ValidationWarning::missing_field("/methods/1", "name"),
            ValidationWarning::invalid_enum("/methods/1/modalities/0", "unknown modality"),
        ]
    }

    #[test]
    fn test_groups_by_kind() {
        let report = ValidationReport::from_warnings(&sample());
        assert_eq!(report.total, 3);
        assert_eq!(report.count(WarningKind::MissingField), 2);
        assert_eq!(report.count(WarningKind::InvalidEnum), 1);
        assert_eq!(report.count(WarningKind::DuplicateId), 0);
        assert!(!report.passed());
    }

    #[test]
    fn test_report_lists_paths() {
        let text = ValidationReport::from_warnings(&sample()).report();
        assert!(text.contains("Warning breakdown:"));
        assert!(text.contains("Missing field: 2"));
        assert!(text.contains("/methods/1/modalities/0: unknown modality"));
    }

    #[test]
    fn test_report_truncates_long_sections() {
        let warnings: Vec<_> = (0..8)
            .map(|i| ValidationWarning::missing_field(format!("/methods/{}", i), "id"))
            .collect();
        let text = ValidationReport::from_warnings(&warnings).report();
        assert!(text.contains("... and 3 more"));
    }

    #[test]
    fn test_empty_report_passes() {
        assert!(ValidationReport::from_warnings(&[]).passed());
    }
}
