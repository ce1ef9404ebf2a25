//! Interactive terminal explorer for the method catalog.
//!
//! The explorer is a thin shell over the [`Store`](crate::store::Store):
//! keys become store actions, the list and detail views read the latest
//! snapshot, and the compare view paints the radar chart's scene onto a
//! braille canvas.
//!
//! # Usage
//!
//! ```rust,no_run
//! use methodscope::config::ChartsConfig;
//! use methodscope::dataset::Catalog;
//! use methodscope::store::Store;
//!
//! let store = Store::new(Catalog::from_methods(Vec::new()));
//! methodscope::tui::run(store, &ChartsConfig::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod actions;
pub mod app;
pub mod compare_view;
pub mod detail_view;
pub mod highlight;
pub mod layout;
pub mod list_view;
pub mod navigation;
pub mod theme;
pub mod view_mode;

use crate::config::ChartsConfig;
use crate::observability::{set_phase, set_tui_active, RunPhase};
use crate::store::Store;
use anyhow::Result;
use app::ExplorerApp;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the terminal while the explorer is on screen.
pub struct ExplorerTui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: ExplorerApp,
}

impl ExplorerTui {
    /// Switch the terminal to raw mode and the alternate screen.
    pub fn new(store: Store, charts: &ChartsConfig) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        set_tui_active(true);

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let mut app = ExplorerApp::new(store, charts);
        let size = terminal.size()?;
        app.on_resize(size.width, size.height, Instant::now());

        Ok(Self { terminal, app })
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        let _phase = set_phase(RunPhase::Interactive);
        loop {
            self.terminal.draw(|f| self.app.render(f))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        // Handle Ctrl+C to quit
                        if key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            break;
                        }
                        if navigation::handle_key(&mut self.app, key, Instant::now())? {
                            break;
                        }
                    }
                    Event::Resize(width, height) => {
                        self.app.on_resize(width, height, Instant::now());
                    }
                    _ => {}
                }
            }

            self.app.tick(Instant::now());
        }

        self.cleanup()?;
        Ok(())
    }

    pub fn app(&self) -> &ExplorerApp {
        &self.app
    }

    /// Restore the terminal.
    fn cleanup(&mut self) -> Result<()> {
        set_tui_active(false);
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ExplorerTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Open the explorer on `store` and block until it is closed.
pub fn run(store: Store, charts: &ChartsConfig) -> Result<()> {
    let mut tui = ExplorerTui::new(store, charts)?;
    tui.run()
}
