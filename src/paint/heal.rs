//! Border healing: join independently drawn borders into proper junctions.
//!
//! After painting, every cell on the perimeter of a bordered box is
//! re-examined. A neighbour *connects* when its glyph belongs to the same
//! border kind and has an arm pointing back at the cell. The cell is then
//! replaced by the glyph carrying its own arms plus one toward every
//! connecting neighbour, so two boxes sharing an edge meet in `┬`, `┴`,
//! `├`, `┤` or `┼` rather than two parallel lines.
//!
//! Only cells that already hold a glyph of the box's border kind are
//! rewritten; text drawn over a border is left alone.

use super::border::BorderGlyphs;
use crate::buffer::Frame;
use crate::layout::{LayoutTree, Rect};
use crate::style::{BorderKind, BorderSides};
use std::collections::HashMap;

/// Neighbourhood of a cell: centre, up, down, left, right.
type Window = [char; 5];

/// Pure healing rule for one cell.
///
/// Returns the replacement glyph, or the centre unchanged if it is not a
/// glyph of `kind`.
pub fn heal_glyph(kind: BorderKind, window: Window) -> char {
    let glyphs = BorderGlyphs::for_kind(kind);
    join(glyphs, window[0], connections(glyphs, window))
}

/// Sides of the centre whose neighbour has an arm pointing back at it.
fn connections(glyphs: &BorderGlyphs, [_, up, down, left, right]: Window) -> BorderSides {
    let points = |ch: char, toward: BorderSides| glyphs.arms(ch).is_some_and(|a| a.contains(toward));
    let mut links = BorderSides::empty();
    if points(up, BorderSides::BOTTOM) {
        links |= BorderSides::TOP;
    }
    if points(down, BorderSides::TOP) {
        links |= BorderSides::BOTTOM;
    }
    if points(left, BorderSides::RIGHT) {
        links |= BorderSides::LEFT;
    }
    if points(right, BorderSides::LEFT) {
        links |= BorderSides::RIGHT;
    }
    links
}

/// The glyph carrying the centre's own arms plus `links`.
fn join(glyphs: &BorderGlyphs, center: char, links: BorderSides) -> char {
    glyphs
        .arms(center)
        .and_then(|arms| glyphs.junction(arms | links))
        .unwrap_or(center)
}

/// Memoising border healer.
///
/// The memo is keyed by border kind, centre glyph and connecting sides, so
/// it holds at most one entry per glyph and side combination no matter what
/// is drawn around the borders.
#[derive(Debug, Default)]
pub struct Healer {
    memo: HashMap<(BorderKind, char, BorderSides), char>,
}

impl Healer {
    /// Create a healer with an empty memo table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoised neighbourhoods.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Heal the borders of every bordered box in `tree`. Returns the number
    /// of cells rewritten.
    pub fn heal(&mut self, frame: &mut Frame, tree: &LayoutTree) -> usize {
        let borders: Vec<(Rect, BorderKind)> = tree
            .boxes()
            .iter()
            .filter_map(|b| b.style.border().map(|kind| (b.border_rect, kind)))
            .collect();
        self.heal_rects(frame, &borders)
    }

    /// Heal the perimeters of `borders`.
    ///
    /// Replacements are computed from the unmodified frame and applied
    /// afterwards, so the result does not depend on visiting order.
    pub fn heal_rects(&mut self, frame: &mut Frame, borders: &[(Rect, BorderKind)]) -> usize {
        let char_at = |x: i32, y: i32| frame.char_at(x, y).unwrap_or(' ');
        let mut replacements = HashMap::new();
        for (rect, kind) in borders {
            let visible = rect.intersection(&frame.area());
            for (x, y) in visible.cells() {
                let on_perimeter =
                    x == rect.x || y == rect.y || x == rect.right() - 1 || y == rect.bottom() - 1;
                if !on_perimeter {
                    continue;
                }
                let center = char_at(x, y);
                let glyphs = BorderGlyphs::for_kind(*kind);
                if !glyphs.contains(center) {
                    continue;
                }
                let window = [
                    center,
                    char_at(x, y - 1),
                    char_at(x, y + 1),
                    char_at(x - 1, y),
                    char_at(x + 1, y),
                ];
                let links = connections(glyphs, window);
                let healed = *self
                    .memo
                    .entry((*kind, center, links))
                    .or_insert_with(|| join(glyphs, center, links));
                if healed != center {
                    replacements.insert((x, y), healed);
                }
            }
        }

        for (&(x, y), &ch) in &replacements {
            if let Some(cell) = frame.get_mut(x, y) {
                cell.set_ch(ch);
            }
        }
        replacements.len()
    }
}
