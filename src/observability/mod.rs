//! Logging setup and crash reporting.
//!
//! Install both at startup:
//!
//! ```ignore
//! use methodscope::observability::{init_tracing, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(verbosity);
//!     // ...
//! }
//! ```
//!
//! Scope work with context guards so a crash report can say where it
//! happened:
//!
//! ```ignore
//! let _phase = set_phase(RunPhase::Exporting);
//! for method in methods {
//!     let _method = set_current_method(&method.id);
//!     export(method)?;
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, set_current_method, set_dataset, set_phase, ContextGuard, RunContext,
    RunPhase,
};
pub use panic_hook::install_panic_hook;
pub use tracing::{init_tracing, is_tui_active, set_tui_active, LOG_ENV_VAR};
