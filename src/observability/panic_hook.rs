//! Crash reports for panics.
//!
//! The report names the phase, dataset and method recorded in
//! [`context`](super::context), the panic location, and the version,
//! platform and time.
//!
//! The terminal is taken out of raw mode and the alternate screen before
//! anything is printed, otherwise a crash inside the explorer is invisible.

use super::context::{get_current_context, RunContext};
use super::tracing::set_tui_active;
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inner width of the report box.
const BOX_WIDTH: usize = 76;

/// Install the crash-report panic hook. Call first thing in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal();

        let message = panic_message(info);
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let span = Span::current().metadata().map(|m| m.name());
        let context = get_current_context();

        let report = CrashReport {
            message: &message,
            location: location.as_deref(),
            span,
            context: &context,
        };
        eprintln!();
        for line in report.lines() {
            eprintln!("{line}");
        }
        print_backtrace();
    }));
}

fn restore_terminal() {
    set_tui_active(false);
    // Already panicking; nothing useful to do with a failure here.
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen);
}

fn print_backtrace() {
    if std::env::var_os("RUST_BACKTRACE").is_some() {
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("Run with RUST_BACKTRACE=1 for a stack trace.");
    }
}

struct CrashReport<'a> {
    message: &'a str,
    location: Option<&'a str>,
    span: Option<&'a str>,
    context: &'a RunContext,
}

impl CrashReport<'_> {
    fn lines(&self) -> Vec<String> {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let phase = self
            .context
            .phase
            .map(|p| p.to_string())
            .unwrap_or_else(|| "startup".to_string());

        let mut fields: Vec<(&str, String)> = vec![
            ("Version", VERSION.to_string()),
            ("Platform", std::env::consts::OS.to_string()),
            ("Time", timestamp),
            ("Panic", self.message.to_string()),
        ];
        if let Some(location) = self.location {
            fields.push(("Location", location.to_string()));
        }
        fields.push(("Phase", phase));
        if let Some(span) = self.span {
            fields.push(("Span", span.to_string()));
        }
        if let Some(dataset) = &self.context.dataset {
            fields.push(("Dataset", dataset.display().to_string()));
        }
        if let Some(method) = &self.context.method {
            fields.push(("Method", method.clone()));
        }

        let rule = "═".repeat(BOX_WIDTH + 2);
        let mut lines = vec![
            format!("╔{rule}╗"),
            boxed(&format!("methodscope {VERSION} crashed")),
            format!("╠{rule}╣"),
        ];
        lines.extend(
            fields
                .iter()
                .map(|(label, value)| boxed(&format!("{label:<9} {value}"))),
        );
        lines.push(format!("╚{rule}╝"));
        lines.push("Please include this report when filing an issue.".to_string());
        if let Some(dataset) = &self.context.dataset {
            lines.push(format!("If possible, attach the dataset: {}", dataset.display()));
        }
        lines
    }
}

fn boxed(text: &str) -> String {
    format!("║ {:<width$} ║", truncate(text, BOX_WIDTH), width = BOX_WIDTH)
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unknown panic".to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::RunPhase;
    use std::path::PathBuf;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let result = truncate("données_très_longues_à_tronquer", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.starts_with("données_t"));
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_report_includes_context() {
        let context = RunContext {
            phase: Some(RunPhase::Exporting),
            dataset: Some(PathBuf::from("data/methods.json")),
            method: Some("ocr-forms".to_string()),
        };
        let report = CrashReport {
            message: "boom",
            location: Some("src/io/html.rs:10:5"),
            span: None,
            context: &context,
        };
        let text = report.lines().join("\n");
        assert!(text.contains("Phase     exporting"));
        assert!(text.contains("Method    ocr-forms"));
        assert!(text.contains("attach the dataset: data/methods.json"));
        assert!(text.contains("src/io/html.rs:10:5"));
    }

    #[test]
    fn test_report_without_phase_says_startup() {
        let context = RunContext::default();
        let report = CrashReport {
            message: "early",
            location: None,
            span: None,
            context: &context,
        };
        let lines = report.lines();
        assert!(lines.iter().any(|l| l.contains("Phase     startup")));
        assert!(lines
            .iter()
            .filter(|l| l.starts_with('║'))
            .all(|l| l.chars().count() == BOX_WIDTH + 4));
    }
}
