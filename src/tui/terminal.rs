//! Terminal setup and teardown.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{Result, WicklineError};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &str) -> impl FnOnce(io::Error) -> WicklineError + '_ {
    move |e| WicklineError::Io(format!("{context}: {e}"))
}

/// Puts the terminal into raw mode on the alternate screen.
///
/// Also installs a panic hook that restores the terminal first, so a
/// panic message is not lost in raw mode.
///
/// # Errors
///
/// Returns [`WicklineError::Io`] if stdout is not a TTY or the terminal
/// cannot be switched over.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(WicklineError::Io(
            "the chart needs an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(io_error("failed to enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_error("failed to enter alternate screen")(e));
    }

    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = reset();
            return Err(io_error("failed to create terminal")(e));
        }
    };

    install_panic_hook();
    Ok(terminal)
}

/// Leaves the alternate screen and disables raw mode.
///
/// # Errors
///
/// Returns [`WicklineError::Io`] if the terminal cannot be restored.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    reset().map_err(io_error("failed to restore terminal"))?;
    terminal
        .show_cursor()
        .map_err(io_error("failed to show cursor"))?;
    Ok(())
}

fn reset() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = reset();
        previous(info);
    }));
}
