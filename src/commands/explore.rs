use crate::cli::RunSettings;
use anyhow::Result;

/// Open the terminal explorer. A catalog that fails to load is shown in the
/// explorer's error state rather than aborting.
pub fn run_explore(settings: &RunSettings) -> Result<()> {
    let store = crate::cli::build_store(settings);
    crate::tui::run(store, &settings.config.charts())
}
