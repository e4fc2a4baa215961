//! Frame: A grid of cells covering every position of the terminal screen.
//!
//! Cells are stored contiguously in row-major order. Drawing operations
//! take signed coordinates and silently clip anything off-screen, so the
//! painter can hand over rectangles straight from an over-constrained
//! layout.

use super::cell::{Cell, CellStyle};
use crate::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A complete cell-by-cell buffer for one rendered screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Frame {
    /// Create a frame of empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the frame width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the frame height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole frame as a rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert signed (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to a cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index_of(x, y).map(|i| &mut self.cells[i])
    }

    /// The character at (x, y), if on-screen.
    #[inline]
    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.get(x, y).map(Cell::ch)
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Fill the on-screen part of a rectangle with blank cells in `style`.
    pub fn fill_rect(&mut self, rect: Rect, style: CellStyle) {
        let clipped = rect.intersection(&self.area());
        for (x, y) in clipped.cells() {
            self.set(x, y, Cell::new(' ').with_style(style));
        }
    }

    /// Replace the cell at (x, y) with a space, keeping its style.
    fn blank(&mut self, x: i32, y: i32) {
        if let Some(style) = self.get(x, y).map(Cell::style) {
            self.set(x, y, Cell::new(' ').with_style(style));
        }
    }

    /// Draw a string starting at (x, y), clipped to `clip`.
    ///
    /// Cells without an explicit background keep the background already
    /// painted underneath. Wide graphemes occupy two columns; a wide
    /// grapheme that would straddle the clip edge is dropped. Overwriting
    /// either half of an existing wide glyph blanks the other half. Returns
    /// the number of columns advanced.
    pub fn draw_str(&mut self, x: i32, y: i32, text: &str, style: CellStyle, clip: Rect) -> i32 {
        let clip = clip.intersection(&self.area());
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let width = grapheme.width() as i32;
            if width == 0 {
                continue;
            }
            if col + width > clip.right() {
                break;
            }
            if col >= clip.x && y >= clip.y && y < clip.bottom() {
                let ch = grapheme.chars().next().unwrap_or(' ');
                let mut cell_style = style;
                if cell_style.bg.is_none() {
                    cell_style.bg = self.get(col, y).and_then(|c| c.style().bg);
                }
                if self.get(col, y).is_some_and(Cell::is_wide_continuation) {
                    self.blank(col - 1, y);
                }
                self.set(col, y, Cell::new(ch).with_style(cell_style));
                if width == 2 {
                    self.set(col + 1, y, Cell::wide_continuation(cell_style));
                }
                if self.get(col + width, y).is_some_and(Cell::is_wide_continuation) {
                    self.blank(col + width, y);
                }
            }
            col += width;
        }
        col - x
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Render the characters of the frame as plain text, one line per row.
    ///
    /// Continuation cells are skipped so wide characters print once.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter().filter(|c| !c.is_wide_continuation()).map(Cell::ch));
        }
        out
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(80, 24);
        assert_eq!(frame.width(), 80);
        assert_eq!(frame.height(), 24);
        assert_eq!(frame.cells().len(), 80 * 24);
    }

    #[test]
    fn test_frame_bounds() {
        let frame = Frame::new(80, 24);
        assert!(frame.get(79, 23).is_some());
        assert!(frame.get(80, 23).is_none());
        assert!(frame.get(-1, 0).is_none());
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut frame = Frame::new(4, 2);
        let style = CellStyle {
            bg: Some(Rgb::new(1, 2, 3)),
            ..CellStyle::DEFAULT
        };
        frame.fill_rect(Rect::new(-2, -2, 4, 3), style);
        assert_eq!(frame.get(0, 0).unwrap().style().bg, Some(Rgb::new(1, 2, 3)));
        assert_eq!(frame.get(1, 0).unwrap().style().bg, Some(Rgb::new(1, 2, 3)));
        assert_eq!(frame.get(2, 0).unwrap().style().bg, None);
        assert_eq!(frame.get(0, 1).unwrap().style().bg, None);
    }

    #[test]
    fn test_draw_str_inherits_background() {
        let mut frame = Frame::new(10, 1);
        let bg = CellStyle {
            bg: Some(Rgb::new(9, 9, 9)),
            ..CellStyle::DEFAULT
        };
        frame.fill_rect(frame.area(), bg);
        frame.draw_str(1, 0, "hi", CellStyle::DEFAULT, frame.area());
        let cell = frame.get(1, 0).unwrap();
        assert_eq!(cell.ch(), 'h');
        assert_eq!(cell.style().bg, Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn test_draw_str_clips_and_wide() {
        let mut frame = Frame::new(5, 1);
        let advanced = frame.draw_str(0, 0, "日本語", CellStyle::DEFAULT, Rect::new(0, 0, 5, 1));
        assert_eq!(advanced, 4);
        assert_eq!(frame.to_text(), "日本 ");
        assert!(frame.get(1, 0).unwrap().is_wide_continuation());
    }

    #[test]
    fn test_overwriting_wide_glyph_blanks_other_half() {
        let mut frame = Frame::new(6, 1);
        frame.draw_str(0, 0, "日本", CellStyle::DEFAULT, frame.area());
        frame.draw_str(0, 0, "a", CellStyle::DEFAULT, frame.area());
        assert!(!frame.get(1, 0).unwrap().is_wide_continuation());
        frame.draw_str(3, 0, "b", CellStyle::DEFAULT, frame.area());
        assert!(!frame.get(3, 0).unwrap().is_wide_continuation());
        assert_eq!(frame.to_text(), "a  b  ");

        frame.draw_str(1, 0, "語", CellStyle::DEFAULT, frame.area());
        frame.draw_str(2, 0, "c", CellStyle::DEFAULT, frame.area());
        assert_eq!(frame.char_at(1, 0), Some(' '));
        assert_eq!(frame.to_text(), "a cb  ");
    }

    #[test]
    fn test_to_text() {
        let mut frame = Frame::new(3, 2);
        frame.draw_str(0, 1, "abc", CellStyle::DEFAULT, frame.area());
        assert_eq!(frame.to_text(), "   \nabc");
    }
}
