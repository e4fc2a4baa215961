//! Property values carried by a [`StyleFragment`](super::StyleFragment).

use bitflags::bitflags;

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Children flow left to right.
    Row,
    /// Children flow top to bottom.
    #[default]
    Column,
}

impl Direction {
    /// The other axis.
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// Size of a box along one axis.
///
/// `Cells` fixes the content extent, with margin, border and padding added
/// around it; `Weight` claims a share of the free space left by the other
/// children; `Auto` sizes to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Size {
    /// Shrink-wrap the content.
    #[default]
    Auto,
    /// A fixed content size in cells.
    Cells(i32),
    /// A proportional share of the parent's free space.
    Weight(i32),
}

/// Main-axis distribution of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justify {
    /// Pack at the start.
    #[default]
    Start,
    /// Pack around the middle.
    Center,
    /// Pack at the end.
    End,
    /// First and last child flush with the edges, equal gaps between.
    SpaceBetween,
    /// Equal space around each child (half-size at the edges).
    SpaceAround,
    /// Equal space between children and at both edges.
    SpaceEvenly,
}

/// Cross-axis alignment of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    /// Flush with the cross-axis start.
    Start,
    /// Centred.
    Center,
    /// Flush with the cross-axis end.
    End,
    /// Fill the parent's cross size (unless the child fixes its own).
    #[default]
    Stretch,
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// Normal flow, then shifted by the offset.
    Relative,
    /// Out of flow; anchored inside the parent's content box.
    Absolute,
    /// Out of flow; anchored inside the viewport.
    Fixed,
}

/// Nine-way anchor used by absolute and fixed positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top edge, centred.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge, centred.
    Left,
    /// Centre.
    Center,
    /// Right edge, centred.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge, centred.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

/// Where an anchor sits along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnchorEdge {
    Start,
    Middle,
    End,
}

impl Anchor {
    /// Horizontal then vertical placement.
    pub(crate) const fn edges(self) -> (AnchorEdge, AnchorEdge) {
        use AnchorEdge::{End, Middle, Start};
        match self {
            Self::TopLeft => (Start, Start),
            Self::Top => (Middle, Start),
            Self::TopRight => (End, Start),
            Self::Left => (Start, Middle),
            Self::Center => (Middle, Middle),
            Self::Right => (End, Middle),
            Self::BottomLeft => (Start, End),
            Self::Bottom => (Middle, End),
            Self::BottomRight => (End, End),
        }
    }
}

/// Glyph family used to draw a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderKind {
    /// `┌─┐`
    Light,
    /// `┏━┓`
    Heavy,
    /// `╔═╗`
    Double,
    /// `╭─╮`
    Rounded,
    /// `+-+`
    Ascii,
}

bitflags! {
    /// Which sides of a box carry a border.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BorderSides: u8 {
        /// Top edge.
        const TOP = 0b0001;
        /// Right edge.
        const RIGHT = 0b0010;
        /// Bottom edge.
        const BOTTOM = 0b0100;
        /// Left edge.
        const LEFT = 0b1000;
        /// All four edges.
        const ALL = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

impl Default for BorderSides {
    fn default() -> Self {
        Self::ALL
    }
}

/// Horizontal placement of text lines inside the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextJustify {
    /// Flush left.
    #[default]
    Left,
    /// Centred (extra column on the left).
    Center,
    /// Flush right.
    Right,
}
