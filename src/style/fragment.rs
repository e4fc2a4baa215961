//! `StyleFragment`: a partial, immutable set of layout and visual properties.

use super::props::{
    Align, Anchor, BorderKind, BorderSides, Direction, Justify, Position, Size, TextJustify,
};
use crate::buffer::{CellStyle, Modifiers, Rgb};
use crate::layout::Edges;

/// A partial style. Every field may be unset; getters resolve unset fields
/// to their defaults.
///
/// Fragments are combined with [`merge`](super::merge), where fields set in
/// the right-hand fragment win.
///
/// # Example
///
/// ```
/// use trellis::style::{merge, BorderKind, Size, StyleFragment};
///
/// let base = StyleFragment::new().with_border(BorderKind::Light).with_gap(1);
/// let wide = StyleFragment::new().with_width(Size::Cells(20)).with_gap(2);
/// let merged = merge(&base, &wide);
/// assert_eq!(merged.border(), Some(BorderKind::Light));
/// assert_eq!(merged.gap(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleFragment {
    direction: Option<Direction>,
    width: Option<Size>,
    height: Option<Size>,
    margin: Option<Edges>,
    padding: Option<Edges>,
    border: Option<BorderKind>,
    border_sides: Option<BorderSides>,
    gap: Option<i32>,
    justify: Option<Justify>,
    align_items: Option<Align>,
    align_self: Option<Align>,
    position: Option<Position>,
    anchor: Option<Anchor>,
    offset: Option<(i32, i32)>,
    background: Option<Rgb>,
    margin_background: Option<Rgb>,
    fg: Option<Rgb>,
    border_fg: Option<Rgb>,
    modifiers: Option<Modifiers>,
    text_justify: Option<TextJustify>,
}

impl StyleFragment {
    /// A fragment with nothing set.
    pub const fn new() -> Self {
        Self {
            direction: None,
            width: None,
            height: None,
            margin: None,
            padding: None,
            border: None,
            border_sides: None,
            gap: None,
            justify: None,
            align_items: None,
            align_self: None,
            position: None,
            anchor: None,
            offset: None,
            background: None,
            margin_background: None,
            fg: None,
            border_fg: None,
            modifiers: None,
            text_justify: None,
        }
    }

    /// Overlay `over` on top of `self` without touching the merge cache.
    #[must_use]
    pub fn overlay(&self, over: &Self) -> Self {
        Self {
            direction: over.direction.or(self.direction),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            margin: over.margin.or(self.margin),
            padding: over.padding.or(self.padding),
            border: over.border.or(self.border),
            border_sides: over.border_sides.or(self.border_sides),
            gap: over.gap.or(self.gap),
            justify: over.justify.or(self.justify),
            align_items: over.align_items.or(self.align_items),
            align_self: over.align_self.or(self.align_self),
            position: over.position.or(self.position),
            anchor: over.anchor.or(self.anchor),
            offset: over.offset.or(self.offset),
            background: over.background.or(self.background),
            margin_background: over.margin_background.or(self.margin_background),
            fg: over.fg.or(self.fg),
            border_fg: over.border_fg.or(self.border_fg),
            modifiers: over.modifiers.or(self.modifiers),
            text_justify: over.text_justify.or(self.text_justify),
        }
    }

    // Builders

    /// Set the main axis.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the width.
    #[must_use]
    pub const fn with_width(mut self, width: Size) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height.
    #[must_use]
    pub const fn with_height(mut self, height: Size) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: Edges) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Set the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Edges) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Draw a border of the given kind (on all sides unless restricted).
    #[must_use]
    pub const fn with_border(mut self, kind: BorderKind) -> Self {
        self.border = Some(kind);
        self
    }

    /// Restrict the border to some sides.
    #[must_use]
    pub const fn with_border_sides(mut self, sides: BorderSides) -> Self {
        self.border_sides = Some(sides);
        self
    }

    /// Set the gap between children.
    #[must_use]
    pub const fn with_gap(mut self, gap: i32) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Set the main-axis distribution.
    #[must_use]
    pub const fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }

    /// Set the default cross-axis alignment of children.
    #[must_use]
    pub const fn with_align_items(mut self, align: Align) -> Self {
        self.align_items = Some(align);
        self
    }

    /// Override the parent's `align_items` for this box.
    #[must_use]
    pub const fn with_align_self(mut self, align: Align) -> Self {
        self.align_self = Some(align);
        self
    }

    /// Set the positioning scheme.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the anchor for absolute/fixed positioning.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Set the positioning offset.
    #[must_use]
    pub const fn with_offset(mut self, dx: i32, dy: i32) -> Self {
        self.offset = Some((dx, dy));
        self
    }

    /// Set the background of the padding box.
    #[must_use]
    pub const fn with_background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the background of the margin area.
    #[must_use]
    pub const fn with_margin_background(mut self, color: Rgb) -> Self {
        self.margin_background = Some(color);
        self
    }

    /// Set the text color.
    #[must_use]
    pub const fn with_fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the border color.
    #[must_use]
    pub const fn with_border_fg(mut self, color: Rgb) -> Self {
        self.border_fg = Some(color);
        self
    }

    /// Set the text attributes.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Set the horizontal justification of text lines.
    #[must_use]
    pub const fn with_text_justify(mut self, justify: TextJustify) -> Self {
        self.text_justify = Some(justify);
        self
    }

    // Resolved getters

    /// Main axis (default: column).
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    /// Width (default: auto).
    pub fn width(&self) -> Size {
        self.width.unwrap_or_default()
    }

    /// Height (default: auto).
    pub fn height(&self) -> Size {
        self.height.unwrap_or_default()
    }

    /// Size along `axis`.
    pub fn size_along(&self, axis: Direction) -> Size {
        match axis {
            Direction::Row => self.width(),
            Direction::Column => self.height(),
        }
    }

    /// Margin (default: none).
    pub fn margin(&self) -> Edges {
        self.margin.unwrap_or_default()
    }

    /// Padding (default: none).
    pub fn padding(&self) -> Edges {
        self.padding.unwrap_or_default()
    }

    /// Border kind, if any.
    pub const fn border(&self) -> Option<BorderKind> {
        self.border
    }

    /// Sides carrying the border. Empty when no border kind is set.
    pub fn border_sides(&self) -> BorderSides {
        if self.border.is_some() {
            self.border_sides.unwrap_or_default()
        } else {
            BorderSides::empty()
        }
    }

    /// Border thickness: one cell on each bordered side.
    pub fn border_edges(&self) -> Edges {
        let sides = self.border_sides();
        let one = |side| i32::from(sides.contains(side));
        Edges::new(
            one(BorderSides::TOP),
            one(BorderSides::RIGHT),
            one(BorderSides::BOTTOM),
            one(BorderSides::LEFT),
        )
    }

    /// Gap between children (default: 0).
    pub fn gap(&self) -> i32 {
        self.gap.unwrap_or(0)
    }

    /// Main-axis distribution (default: start).
    pub fn justify(&self) -> Justify {
        self.justify.unwrap_or_default()
    }

    /// Cross-axis alignment for children (default: stretch).
    pub fn align_items(&self) -> Align {
        self.align_items.unwrap_or_default()
    }

    /// Own cross-axis alignment override.
    pub const fn align_self(&self) -> Option<Align> {
        self.align_self
    }

    /// Positioning scheme (default: static).
    pub fn position(&self) -> Position {
        self.position.unwrap_or_default()
    }

    /// Anchor (default: top-left).
    pub fn anchor(&self) -> Anchor {
        self.anchor.unwrap_or_default()
    }

    /// Positioning offset (default: none).
    pub fn offset(&self) -> (i32, i32) {
        self.offset.unwrap_or((0, 0))
    }

    /// Background of the padding box.
    pub const fn background(&self) -> Option<Rgb> {
        self.background
    }

    /// Background of the margin area.
    pub const fn margin_background(&self) -> Option<Rgb> {
        self.margin_background
    }

    /// Text color.
    pub const fn fg(&self) -> Option<Rgb> {
        self.fg
    }

    /// Border color (falls back to the text color).
    pub fn border_fg(&self) -> Option<Rgb> {
        self.border_fg.or(self.fg)
    }

    /// Text attributes (default: none).
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.unwrap_or_default()
    }

    /// Text line justification (default: left).
    pub fn text_justify(&self) -> TextJustify {
        self.text_justify.unwrap_or_default()
    }

    /// The cell style text drawn with this fragment uses.
    pub fn text_style(&self) -> CellStyle {
        CellStyle {
            fg: self.fg,
            bg: self.background,
            modifiers: self.modifiers(),
        }
    }
}
