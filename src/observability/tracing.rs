//! Tracing subscriber setup.
//!
//! `METHODSCOPE_LOG` takes an `EnvFilter` directive (`debug`,
//! `methodscope::store=trace`, ...) and wins over the `-v` count. While the
//! terminal explorer is on screen, log output is dropped so it cannot tear
//! the UI.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "METHODSCOPE_LOG";

static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Mark whether the TUI owns the terminal.
pub fn set_tui_active(active: bool) {
    TUI_ACTIVE.store(active, Ordering::SeqCst);
}

pub fn is_tui_active() -> bool {
    TUI_ACTIVE.load(Ordering::SeqCst)
}

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(TuiAwareWriter)
        .with_target(verbosity >= 2)
        .try_init();
}

/// Writes to stderr unless the TUI is active.
#[derive(Debug, Clone, Copy)]
pub struct TuiAwareWriter;

pub enum LogSink {
    Stderr(io::Stderr),
    Discard,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Stderr(err) => err.write(buf),
            LogSink::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Stderr(err) => err.flush(),
            LogSink::Discard => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for TuiAwareWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        if is_tui_active() {
            LogSink::Discard
        } else {
            LogSink::Stderr(io::stderr())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn test_sink_discards_while_tui_active() {
        set_tui_active(true);
        let mut sink = TuiAwareWriter.make_writer();
        assert!(matches!(sink, LogSink::Discard));
        assert_eq!(sink.write(b"hidden").unwrap(), 6);
        set_tui_active(false);
        assert!(matches!(TuiAwareWriter.make_writer(), LogSink::Stderr(_)));
    }
}
