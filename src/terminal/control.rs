//! Terminal mode control: raw mode, alternate screen, cursor, mouse.
//!
//! The scheduler only calls [`TerminalControl::enter`] at startup and
//! [`TerminalControl::leave`] at shutdown (on every exit path).

use crate::runtime::RuntimeConfig;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Process-level terminal control.
pub trait TerminalControl {
    /// Current size as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Prepare the terminal for rendering.
    fn enter(&mut self, config: &RuntimeConfig) -> io::Result<()>;

    /// Restore the terminal.
    fn leave(&mut self, config: &RuntimeConfig) -> io::Result<()>;
}

/// The real terminal, driven through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermTerminal {
    entered: bool,
}

impl CrosstermTerminal {
    /// Create a handle; nothing is changed until [`enter`](TerminalControl::enter).
    pub const fn new() -> Self {
        Self { entered: false }
    }
}

impl TerminalControl for CrosstermTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn enter(&mut self, config: &RuntimeConfig) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.entered = true;
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)
    }

    fn leave(&mut self, config: &RuntimeConfig) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let mut stdout = io::stdout();
        // Best effort: restore as much as possible even if one step fails.
        let _ = execute!(stdout, cursor::Show);
        if config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        terminal::disable_raw_mode()
    }
}

/// A fixed-size stand-in for tests and offscreen rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessTerminal {
    width: u16,
    height: u16,
    entered: bool,
    sessions: u32,
}

impl HeadlessTerminal {
    /// A terminal of `width` x `height` cells.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            entered: false,
            sessions: 0,
        }
    }

    /// True between `enter` and `leave`.
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Number of completed enter/leave pairs.
    pub const fn sessions(&self) -> u32 {
        self.sessions
    }
}

impl TerminalControl for HeadlessTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn enter(&mut self, _config: &RuntimeConfig) -> io::Result<()> {
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self, _config: &RuntimeConfig) -> io::Result<()> {
        if self.entered {
            self.entered = false;
            self.sessions += 1;
        }
        Ok(())
    }
}
