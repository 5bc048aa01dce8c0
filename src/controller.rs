//! Application controller.
//!
//! Owns the terminal for the lifetime of the viewer: raw mode and the
//! alternate screen are entered on construction and restored in `Drop`,
//! so a panic or an early `?` return still leaves the terminal usable.
//! The main loop ticks the state (which expires the alert deadline),
//! renders, then polls for input.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::event::{apply_action, handle_event, poll_event};
use crate::model::AppState;
use crate::ui::render;

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            // The tick dismisses an expired alert even with no input pending
            self.state.tick();

            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, self.state.alert_active());
                apply_action(&mut self.state, action);

                if self.state.should_quit {
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Convenience function to run the viewer with the given artifact paths.
pub fn run_app(state: AppState) -> Result<()> {
    let mut app = App::new(state)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use crate::model::ViewerPaths;

    use super::*;

    #[test]
    fn test_app_state_creation() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ViewerPaths {
            seq_stats: dir.path().join("stats.csv"),
            blastout_dir: dir.path().to_path_buf(),
            tree_file: dir.path().join("absent.treefile"),
        };
        let state = AppState::new(paths);

        assert!(!state.should_quit);
        assert!(state.input.is_empty());
        assert!(!state.alert_active());
    }
}
