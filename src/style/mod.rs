//! Style: immutable, mergeable fragments describing the box model.
//!
//! - [`StyleFragment`]: partial style, every field optional
//! - [`merge`]: right-biased overlay with a bounded memoisation cache
//! - property enums consumed by layout ([`Size`], [`Justify`], [`Align`], ...)
//!   and paint ([`BorderKind`], [`TextJustify`])

mod cache;
mod fragment;
mod props;

pub use cache::{merge, merge_cache_len, MERGE_CACHE_CAPACITY};
pub use fragment::StyleFragment;
pub(crate) use props::AnchorEdge;
pub use props::{
    Align, Anchor, BorderKind, BorderSides, Direction, Justify, Position, Size, TextJustify,
};
pub use crate::buffer::{Modifiers, Rgb};
