//! Terminal setup and teardown.
//!
//! Frames go to stderr through a `BufWriter`, so stdout stays clean and each
//! draw costs few write(2) calls. ratatui 0.30 does not restore the terminal
//! on drop: [`restore_tui`] runs on every exit path, including panics.

use std::io::{self, BufWriter, Stderr};
use std::panic;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;

pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Raw mode, alternate screen, mouse capture.
///
/// # Errors
///
/// Fails if the terminal rejects any of the three.
pub fn init_tui() -> io::Result<Tui> {
    terminal::enable_raw_mode()?;
    let mut out = BufWriter::new(io::stderr());
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Undoes [`init_tui`]. Safe to call more than once.
///
/// # Errors
///
/// Fails if the terminal rejects the reset.
pub fn restore_tui() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)
}

/// Restores the terminal before the previous panic hook prints, so the
/// message is readable. Install before [`init_tui`].
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_tui();
        previous(info);
    }));
}

/// Returns a flag that SIGTERM sets. The main loop polls it.
///
/// # Errors
///
/// Fails if the handler cannot be registered.
pub fn register_sigterm() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
