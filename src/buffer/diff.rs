//! Frame Differ: compute the minimal set of changed cells between frames.
//!
//! 1. Compare the previous and the next frame row by row; identical rows
//!    are skipped wholesale before any per-cell comparison.
//! 2. Collect every cell whose value changed into a [`ChangeSet`].
//! 3. Encode the change set as an ANSI instruction stream: cursor move,
//!    style, character, reset, for each changed cell.
//!
//! Applying a change set to the previous frame reproduces the next frame
//! exactly, which is what lets the scheduler keep only one frame around.

use super::{Cell, Frame};
use crate::terminal::OutputBuffer;

/// A single changed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    /// Column (0-indexed).
    pub x: u16,
    /// Row (0-indexed).
    pub y: u16,
    /// New cell value.
    pub cell: Cell,
}

/// Every cell that differs between two frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    width: u16,
    height: u16,
    /// The frame size changed; the target must be blanked first.
    resized: bool,
    changes: Vec<CellChange>,
}

/// Statistics about an encoded change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells written to the terminal.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of cells that needed style sequences.
    pub styled_cells: usize,
}

/// Diff `next` against `previous`.
///
/// If the two frames differ in size, `next` is diffed against a blank frame
/// of its own size (the caller is expected to clear the screen).
pub fn diff_frames(previous: &Frame, next: &Frame) -> ChangeSet {
    let resized = previous.width() != next.width() || previous.height() != next.height();
    let blank;
    let previous = if resized {
        blank = Frame::new(next.width(), next.height());
        &blank
    } else {
        previous
    };

    let mut changes = Vec::new();
    for (y, (old_row, new_row)) in previous.rows().zip(next.rows()).enumerate() {
        if old_row == new_row {
            continue;
        }
        for (x, (old, new)) in old_row.iter().zip(new_row).enumerate() {
            if old != new {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *new,
                });
            }
        }
    }

    ChangeSet {
        width: next.width(),
        height: next.height(),
        resized,
        changes,
    }
}

impl ChangeSet {
    /// Number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True when the frames were identical.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && !self.resized
    }

    /// Iterate over the changed cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CellChange> {
        self.changes.iter()
    }

    /// Apply the changes to `frame`, turning the previous frame into the next.
    pub fn apply(&self, frame: &mut Frame) {
        if self.resized || frame.width() != self.width || frame.height() != self.height {
            *frame = Frame::new(self.width, self.height);
        }
        for change in &self.changes {
            frame.set(i32::from(change.x), i32::from(change.y), change.cell);
        }
    }

    /// Encode the changes as terminal instructions.
    ///
    /// Continuation cells are not written: the wide character before them
    /// already covers their column. A cursor move is skipped when the
    /// cursor already sits on the target cell after the previous write.
    pub fn encode(&self, output: &mut OutputBuffer) -> DiffResult {
        let mut result = DiffResult::default();
        let mut cursor: Option<(u16, u16)> = None;

        for change in &self.changes {
            if change.cell.is_wide_continuation() {
                continue;
            }
            result.cells_changed += 1;

            if cursor != Some((change.x, change.y)) {
                output.cursor_move(change.x, change.y);
                result.cursor_moves += 1;
            }

            let styled = output.set_style(change.cell.style());
            output.write_char(change.cell.ch());
            if styled {
                output.reset_attrs();
                result.styled_cells += 1;
            }

            let advance = change.cell.display_width().max(1) as u16;
            cursor = Some((change.x.saturating_add(advance), change.y));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{CellStyle, Modifiers, Rgb};

    fn sample(seed: u32) -> Frame {
        let mut frame = Frame::new(12, 4);
        for y in 0..4 {
            for x in 0..12 {
                let ch = char::from_u32('a' as u32 + (x + y + seed) % 26).unwrap_or('?');
                frame.set(
                    x as i32,
                    y as i32,
                    Cell::new(ch).with_fg(Rgb::new((x * 20) as u8, (y * 40) as u8, seed as u8)),
                );
            }
        }
        frame
    }

    /// Feed the encoded stream of `changes` into a VT100 parser primed with `base`.
    fn replay(base: &Frame, changes: &ChangeSet) -> vt100::Parser {
        let mut parser = vt100::Parser::new(base.height(), base.width(), 0);
        let mut full = OutputBuffer::new();
        diff_frames(&Frame::new(base.width(), base.height()), base).encode(&mut full);
        parser.process(full.as_bytes());

        let mut out = OutputBuffer::new();
        changes.encode(&mut out);
        parser.process(out.as_bytes());
        parser
    }

    #[test]
    fn test_diff_identical_frames() {
        let a = sample(0);
        let changes = diff_frames(&a, &a.clone());
        assert!(changes.is_empty());

        let mut out = OutputBuffer::new();
        let result = changes.encode(&mut out);
        assert_eq!(result.cells_changed, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Frame::new(10, 5);
        let mut b = Frame::new(10, 5);
        b.set(5, 2, Cell::new('X'));

        let changes = diff_frames(&a, &b);
        assert_eq!(changes.len(), 1);

        let mut out = OutputBuffer::new();
        changes.encode(&mut out);
        assert_eq!(out.as_bytes(), b"\x1b[3;6fX");
    }

    #[test]
    fn test_styled_cell_is_reset() {
        let a = Frame::new(3, 1);
        let mut b = Frame::new(3, 1);
        b.set(0, 0, Cell::new('B').with_modifiers(Modifiers::BOLD));

        let mut out = OutputBuffer::new();
        let result = diff_frames(&a, &b).encode(&mut out);
        assert_eq!(result.styled_cells, 1);
        assert_eq!(out.as_bytes(), b"\x1b[1;1f\x1b[1mB\x1b[0m");
    }

    #[test]
    fn test_adjacent_cells_skip_cursor_move() {
        let a = Frame::new(10, 5);
        let mut b = Frame::new(10, 5);
        b.set(0, 0, Cell::new('A'));
        b.set(1, 0, Cell::new('B'));
        b.set(2, 0, Cell::new('C'));

        let mut out = OutputBuffer::new();
        let result = diff_frames(&a, &b).encode(&mut out);
        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
    }

    #[test]
    fn test_apply_reproduces_next() {
        let a = sample(0);
        let mut b = sample(7);
        b.set(3, 3, Cell::new('Z').with_bg(Rgb::new(1, 1, 1)));

        let changes = diff_frames(&a, &b);
        let mut applied = a.clone();
        changes.apply(&mut applied);
        assert_eq!(applied, b);
    }

    #[test]
    fn test_apply_after_resize() {
        let a = Frame::new(4, 4);
        let mut b = Frame::new(6, 2);
        b.set(5, 1, Cell::new('q'));

        let changes = diff_frames(&a, &b);
        assert!(!changes.is_empty());
        let mut applied = a;
        changes.apply(&mut applied);
        assert_eq!(applied, b);
    }

    #[test]
    fn test_encoded_stream_reproduces_screen() {
        let a = sample(0);
        let mut b = sample(3);
        let red = CellStyle {
            fg: Some(Rgb::new(255, 0, 0)),
            bg: None,
            modifiers: Modifiers::UNDERLINE,
        };
        b.draw_str(2, 1, "日本", red, b.area());

        let parser = replay(&a, &diff_frames(&a, &b));
        let screen = parser.screen();
        for (y, line) in b.to_text().lines().enumerate() {
            let row = screen.contents_between(y as u16, 0, y as u16, b.width());
            assert_eq!(row.trim_end(), line.trim_end(), "row {y}");
        }
        let cell = screen.cell(1, 2).unwrap();
        assert_eq!(cell.contents(), "日");
        assert!(cell.underline());
        assert_eq!(cell.fgcolor(), vt100::Color::Rgb(255, 0, 0));
    }
}
