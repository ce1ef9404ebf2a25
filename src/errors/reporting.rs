//! Terminal reporting for dataset validation.

use super::summary::ValidationReport;
use colored::Colorize;

/// Prints the pass/fail summary for a validated dataset.
pub fn report_validation_summary(source: &str, method_count: usize, report: &ValidationReport) {
    println!("Validating {}", source);
    println!("  Methods loaded: {}", method_count);

    if report.passed() {
        println!("{} Dataset is valid", "✓".green());
    } else {
        println!(
            "{} Dataset has {} validation issue(s)",
            "✗".red(),
            report.total
        );
        println!("{}", report.report());
    }
}

/// Reports a brief warning line after a load.
pub fn report_brief_summary(report: &ValidationReport) {
    if !report.passed() {
        eprintln!(
            "⚠ Dataset loaded with {} validation warning(s); run `methodscope validate` for details",
            report.total
        );
    }
}
