//! Error types for Trellis operations.

use crate::hooks::NodeId;
use crate::layout::PartitionError;
use thiserror::Error;

/// Core error type for the render cycle.
///
/// Everything here is fatal to [`Scheduler::run`](crate::runtime::Scheduler::run):
/// recoverable conditions (malformed input, over-constrained layout) never
/// surface as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred while talking to the terminal or spawning a thread.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A component produced a different sequence of hook kinds than on a
    /// previous render of the same instance.
    #[error(
        "inconsistent hook execution in node {node}: slot {index} is {found}, \
         but the render asked for {expected}"
    )]
    InconsistentHookExecution {
        /// Owning shadow node.
        node: NodeId,
        /// Positional slot index.
        index: usize,
        /// Kind requested by the current render.
        expected: &'static str,
        /// Kind recorded by a previous render.
        found: &'static str,
    },

    /// An effect body observed cancellation and then returned normally.
    #[error("effect in node {node} (slot {slot}) swallowed its cancellation")]
    EffectSwallowedCancellation {
        /// Owning shadow node.
        node: NodeId,
        /// Positional slot index of the effect.
        slot: usize,
    },

    /// Integer partition was asked to split by invalid weights.
    #[error("layout partition failed: {0}")]
    Partition(#[from] PartitionError),

    /// Every sender of the event queue is gone.
    #[error("event queue disconnected")]
    QueueDisconnected,
}

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
