//! Paint module: box tree to cell grid.
//!
//! [`paint`] rasterizes a layout, the [`Healer`] joins adjacent borders
//! afterwards.

mod border;
mod heal;
pub(crate) mod painter;

pub use border::BorderGlyphs;
pub use heal::{heal_glyph, Healer};
pub use painter::paint;
