//! Terminal User Interface module

mod app;
mod browse;
mod components;
pub mod keys;
mod review;
mod styles;

pub use app::App;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, IsTerminal};

use crate::selection::{SelectionError, SelectionOutcome, Session};

/// Run the interactive selector on the controlling terminal.
///
/// Fails with [`SelectionError::IoUnavailable`] when stdin or stdout is not a
/// terminal, so callers can fall back to line prompts.
pub fn run_selector(session: Session) -> Result<SelectionOutcome, SelectionError> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal").into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}
