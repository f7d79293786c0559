use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

use super::widgets::{self, Widget};

/// Drawing side of the terminal
pub trait RenderSurface {
    /// Blank the whole viewport
    fn clear(&mut self) -> Result<()>;

    /// Paint exactly the given widgets, nothing else
    fn draw(&mut self, widgets: &[Widget]) -> Result<()>;
}

/// Render surface backed by a ratatui terminal.
///
/// When created with [`TerminalSurface::init`] it owns the terminal mode
/// (raw mode and alternate screen) and restores it on [`close`] or drop.
///
/// [`close`]: TerminalSurface::close
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    owns_terminal_mode: bool,
    closed: bool,
}

impl TerminalSurface<CrosstermBackend<io::Stdout>> {
    /// Enter full-screen mode on stdout
    pub fn init() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to setup terminal");
        }

        let terminal = restore_on_error(
            Terminal::new(CrosstermBackend::new(stdout)),
            leave_terminal_mode,
        )
        .context("Failed to create terminal")?;

        // From here on, dropping the surface restores the terminal
        let mut surface = Self {
            terminal,
            owns_terminal_mode: true,
            closed: false,
        };
        surface.terminal.hide_cursor().context("Failed to hide cursor")?;

        tracing::debug!("Terminal surface initialized");
        Ok(surface)
    }
}

/// Run `restore` when `result` failed, keeping the original error
fn restore_on_error<T>(result: io::Result<T>, restore: impl FnOnce() -> Result<()>) -> io::Result<T> {
    if result.is_err() {
        if let Err(e) = restore() {
            tracing::warn!("Failed to restore terminal: {:#}", e);
        }
    }
    result
}

/// Undo raw mode and the alternate screen, attempting both steps
fn leave_terminal_mode() -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(io::stdout(), LeaveAlternateScreen).context("Failed to restore terminal");
    raw.and(screen)
}

impl<B: Backend> TerminalSurface<B> {
    /// Wrap an arbitrary backend without touching the terminal mode
    pub fn with_backend(backend: B) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend).context("Failed to create terminal")?,
            owns_terminal_mode: false,
            closed: false,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.owns_terminal_mode {
            leave_terminal_mode()?;
            self.terminal.show_cursor().context("Failed to show cursor")?;
            tracing::debug!("Terminal surface restored");
        }

        Ok(())
    }
}

impl<B: Backend> RenderSurface for TerminalSurface<B> {
    fn clear(&mut self) -> Result<()> {
        self.terminal.clear().context("Failed to clear terminal")
    }

    fn draw(&mut self, widgets: &[Widget]) -> Result<()> {
        self.terminal
            .draw(|frame| {
                let viewport = frame.area();
                for widget in widgets {
                    widgets::render(widget, viewport, frame.buffer_mut());
                }
            })
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalSurface<B> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
