//! Runtime: event queue, input thread, effect tasks and the scheduler.
//!
//! Only two kinds of threads exist besides the caller's: the input reader,
//! which blocks on raw reads and feeds the queue, and one thread per
//! running effect. Everything else happens on the thread that calls
//! [`run`] or [`run_with`].

mod config;
pub(crate) mod effects;
mod event;
mod reader;
mod scheduler;

pub use config::RuntimeConfig;
pub use effects::{Cancelled, EffectContext, EffectResult};
pub use event::{Event, EventKind, EventSender};
pub use reader::InputReader;
pub use scheduler::{RenderStats, Scheduler};

use crate::element::Node;
use crate::error::Result;
use crate::terminal::{CrosstermTerminal, TerminalControl};
use std::io::{Read, Write};

/// Run `root` on the process terminal with the default configuration.
///
/// Reads input from stdin and writes frames to stdout until the quit key
/// (Ctrl+C) or a handler's quit request.
pub fn run(root: impl Into<Node>) -> Result<()> {
    run_with(
        root,
        std::io::stdin(),
        std::io::stdout(),
        CrosstermTerminal::new(),
        RuntimeConfig::default(),
    )
}

/// Run `root` with explicit streams, terminal control and configuration.
pub fn run_with<R, W, T>(
    root: impl Into<Node>,
    input: R,
    output: W,
    terminal: T,
    config: RuntimeConfig,
) -> Result<()>
where
    R: Read + Send + 'static,
    W: Write,
    T: TerminalControl,
{
    let chunk_size = config.read_chunk_size;
    let mut scheduler = Scheduler::new(terminal, output, config);
    let reader = InputReader::spawn(input, scheduler.events(), chunk_size)?;
    let result = scheduler.run(&root.into());
    reader.stop();
    result
}
