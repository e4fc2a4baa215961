//! # Trellis
//!
//! A retained-mode component framework for terminal user interfaces.
//!
//! Components describe the UI as a tree of [`Element`]s. A reconciler keeps
//! per-component state alive across re-renders, a flexbox-style engine lays
//! the tree out, and a painter rasterizes it into a cell grid that is
//! diffed against the previous frame and written as minimal ANSI output.
//!
//! ## Core Concepts
//!
//! - **Components and hooks**: plain functions taking [`Hooks`] and props;
//!   `use_state`, `use_ref` and `use_effect` give them persistent state
//! - **Positional reconciliation**: a component keeps its state while the
//!   same function (and key) renders at the same position
//! - **Exact layout arithmetic**: weighted space is split so parts always
//!   sum to the total, and over-constrained layouts are clipped, not clamped
//! - **Border healing**: independently drawn borders meet in proper junctions
//! - **Single render thread**: input is read on its own thread, effects run
//!   as cancellable tasks, everything else happens in one cycle
//!
//! ## Example
//!
//! ```rust,no_run
//! use trellis::{Component, Element, Hooks, KeyCode, Node, Response, StyleFragment};
//!
//! fn counter(hooks: &mut Hooks<'_>, _: &()) -> trellis::Result<Node> {
//!     let (count, set_count) = hooks.use_state(0)?;
//!     Ok(Element::container(StyleFragment::new())
//!         .child(Element::text(format!("pressed {count} times")))
//!         .on_key(move |key| match key.code {
//!             KeyCode::Char(' ') => {
//!                 set_count.update(|n| n + 1);
//!                 Response::Consumed
//!             }
//!             KeyCode::Char('q') => Response::Quit,
//!             _ => Response::Continue,
//!         })
//!         .into())
//! }
//!
//! trellis::run(Component::new(counter, ()))?;
//! # Ok::<(), trellis::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod element;
pub mod error;
pub mod hooks;
pub mod input;
pub mod layout;
pub mod logging;
pub mod paint;
pub mod reconcile;
pub mod runtime;
pub mod screenshot;
pub mod style;
pub mod terminal;

// Re-exports for convenience
pub use buffer::{Cell, CellStyle, Frame};
pub use element::{Component, Container, Element, Node, Response, Text, TextRun};
pub use error::{Error, Result};
pub use hooks::{Deps, HookRef, Hooks, NodeId, Setter};
pub use input::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
pub use layout::{Edges, LayoutTree, Rect};
pub use runtime::{run, run_with, Cancelled, EffectContext, EffectResult, RuntimeConfig, Scheduler};
pub use style::{
    Align, Anchor, BorderKind, BorderSides, Direction, Justify, Modifiers, Position, Rgb, Size,
    StyleFragment, TextJustify,
};
