//! Terminal module: ANSI output and terminal mode control.

mod control;
mod output;

pub use control::{CrosstermTerminal, HeadlessTerminal, TerminalControl};
pub use output::OutputBuffer;
