//! Buffer module: Core data structures for frame-based rendering.
//!
//! This module contains:
//! - [`Cell`]: The atomic unit of display (character plus style)
//! - [`Frame`]: A grid of cells covering the whole terminal screen
//! - [`Rgb`]: True-color representation
//! - [`Modifiers`]: Text style bitflags
//! - [`diff`]: Frame differ producing minimal ANSI instruction streams

mod cell;
mod frame;
pub mod diff;

pub use cell::{Cell, CellStyle, Modifiers, Rgb};
pub use diff::{diff_frames, CellChange, ChangeSet, DiffResult};
pub use frame::Frame;
