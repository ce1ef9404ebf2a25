//! Thread-local context tracking for crash reports.
//!
//! Records what the process was doing (phase, dataset, method) so the panic
//! hook can say more than a file and line. Guards restore the previous
//! context on drop, so scopes nest.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<RunContext> = const { RefCell::new(RunContext::new()) };
}

/// What the process was doing when an error occurred.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub phase: Option<RunPhase>,
    /// Dataset file in use
    pub dataset: Option<PathBuf>,
    /// Method being rendered or exported, if any
    pub method: Option<String>,
}

impl RunContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            dataset: None,
            method: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    ConfigLoading,
    DatasetLoading,
    Filtering,
    Rendering,
    Exporting,
    /// The terminal explorer owns the screen.
    Interactive,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigLoading => write!(f, "config_loading"),
            Self::DatasetLoading => write!(f, "dataset_loading"),
            Self::Filtering => write!(f, "filtering"),
            Self::Rendering => write!(f, "rendering"),
            Self::Exporting => write!(f, "exporting"),
            Self::Interactive => write!(f, "interactive"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: RunContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn with_update(update: impl FnOnce(&mut RunContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        update(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: RunPhase) -> ContextGuard {
    with_update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_dataset(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    with_update(|ctx| ctx.dataset = Some(path))
}

#[must_use]
pub fn set_current_method(id: impl Into<String>) -> ContextGuard {
    let id = id.into();
    with_update(|ctx| ctx.method = Some(id))
}

/// Snapshot of the current thread's context.
#[must_use]
pub fn get_current_context() -> RunContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_nest_and_restore() {
        {
            let _phase = set_phase(RunPhase::Exporting);
            {
                let _method = set_current_method("ocr");
                let ctx = get_current_context();
                assert_eq!(ctx.phase, Some(RunPhase::Exporting));
                assert_eq!(ctx.method.as_deref(), Some("ocr"));
            }
            assert_eq!(get_current_context().method, None);
        }
        assert_eq!(get_current_context().phase, None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RunPhase::DatasetLoading.to_string(), "dataset_loading");
    }
}
