//! Layout module: a flexbox-style box model over the concrete element tree.
//!
//! Geometry is signed and never clamped; consumers clip. The box tree is a
//! flat arena rebuilt on every render, addressed by [`BoxId`].

mod partition;
mod rect;
mod tree;

pub use partition::{halve_integer, partition_int, PartitionError};
pub use rect::{Edges, Rect};
pub use tree::{BoxContent, BoxId, LayoutBox, LayoutTree, TextLine, TextSpan};
