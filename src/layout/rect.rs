//! Rect and Edges: geometry primitives for the box model.
//!
//! Coordinates are signed. Over-constrained layouts produce rectangles with
//! negative origins or extents, and every consumer clips instead of
//! rejecting them.

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: i32,
    /// Y coordinate (row) of the top-left corner.
    pub y: i32,
    /// Width in columns (may be zero or negative).
    pub width: i32,
    /// Height in rows (may be zero or negative).
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from a terminal size (full screen).
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Check if the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The overlapping area of two rectangles (empty if disjoint).
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Self::new(x, y, 0, 0);
        }
        Self::new(x, y, right - x, bottom - y)
    }

    /// Move the rectangle by an offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by per-side edges. Extents may go negative.
    #[inline]
    #[must_use]
    pub const fn shrink(&self, edges: Edges) -> Self {
        Self::new(
            self.x + edges.left,
            self.y + edges.top,
            self.width - edges.horizontal(),
            self.height - edges.vertical(),
        )
    }

    /// Iterate over every (x, y) in the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Self {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height.max(0)).flat_map(move |row| (x..x + width.max(0)).map(move |col| (col, row)))
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Per-side thickness (margin, border, or padding).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Edges {
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
    /// Left edge.
    pub left: i32,
}

impl Edges {
    /// No thickness on any side.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create edges in CSS order: top, right, bottom, left.
    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same thickness on all four sides.
    #[inline]
    pub const fn all(n: i32) -> Self {
        Self::new(n, n, n, n)
    }

    /// Vertical thickness on top/bottom, horizontal on left/right.
    #[inline]
    pub const fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Add two edge sets side by side.
    #[inline]
    #[must_use]
    pub const fn plus(&self, other: Self) -> Self {
        Self::new(
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
            self.left + other.left,
        )
    }
}
