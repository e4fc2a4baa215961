//! Painter: rasterizes a [`LayoutTree`] into a [`Frame`].
//!
//! Boxes are painted in pre-order, so children land on top of their
//! parents and later siblings on top of earlier ones. There is no z-order.

use super::border::BorderGlyphs;
use crate::buffer::{Cell, CellStyle, Frame};
use crate::layout::{halve_integer, BoxContent, LayoutBox, LayoutTree, Rect, TextLine};
use crate::style::{BorderKind, BorderSides, TextJustify};

/// Paint every box of `tree` into `frame`.
///
/// The frame is not cleared first; callers hand in a blank frame.
pub fn paint(tree: &LayoutTree, frame: &mut Frame) {
    for b in tree.boxes() {
        paint_box(b, frame);
    }
}

fn paint_box(b: &LayoutBox, frame: &mut Frame) {
    let style = &b.style;
    if let Some(color) = style.margin_background() {
        frame.fill_rect(b.margin_rect, CellStyle { bg: Some(color), ..CellStyle::DEFAULT });
    }
    if let Some(color) = style.background() {
        frame.fill_rect(b.padding_rect, CellStyle { bg: Some(color), ..CellStyle::DEFAULT });
    }
    if let Some(kind) = style.border() {
        let border_style = CellStyle {
            fg: style.border_fg(),
            bg: style.background(),
            modifiers: style.modifiers(),
        };
        draw_border(frame, b.border_rect, kind, style.border_sides(), border_style);
    }
    if let BoxContent::Text(lines) = &b.content {
        draw_lines(frame, b.content_rect, lines, style.text_justify());
    }
}

/// Draw the declared `sides` of a border around `rect`.
///
/// Edges run the full length of the rectangle; a corner replaces the edge
/// glyph only where both of its sides are declared. Cells keep the
/// background already underneath unless `style` sets one.
pub(crate) fn draw_border(
    frame: &mut Frame,
    rect: Rect,
    kind: BorderKind,
    sides: BorderSides,
    style: CellStyle,
) {
    if rect.is_empty() || sides.is_empty() {
        return;
    }
    let glyphs = BorderGlyphs::for_kind(kind);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
    // Edge runs only visit cells that exist in the frame.
    let columns = left.max(0)..=right.min(i32::from(frame.width()) - 1);
    let rows = top.max(0)..=bottom.min(i32::from(frame.height()) - 1);

    if sides.contains(BorderSides::TOP) {
        for x in columns.clone() {
            put(frame, x, top, glyphs.horizontal, style);
        }
    }
    if sides.contains(BorderSides::BOTTOM) {
        for x in columns {
            put(frame, x, bottom, glyphs.horizontal, style);
        }
    }
    if sides.contains(BorderSides::LEFT) {
        for y in rows.clone() {
            put(frame, left, y, glyphs.vertical, style);
        }
    }
    if sides.contains(BorderSides::RIGHT) {
        for y in rows {
            put(frame, right, y, glyphs.vertical, style);
        }
    }

    let corners = [
        (BorderSides::TOP | BorderSides::LEFT, left, top, glyphs.top_left),
        (BorderSides::TOP | BorderSides::RIGHT, right, top, glyphs.top_right),
        (BorderSides::BOTTOM | BorderSides::LEFT, left, bottom, glyphs.bottom_left),
        (BorderSides::BOTTOM | BorderSides::RIGHT, right, bottom, glyphs.bottom_right),
    ];
    for (needed, x, y, ch) in corners {
        if sides.contains(needed) {
            put(frame, x, y, ch, style);
        }
    }
}

/// Write one glyph, keeping the background underneath when `style` has none.
fn put(frame: &mut Frame, x: i32, y: i32, ch: char, style: CellStyle) {
    if let Some(cell) = frame.get_mut(x, y) {
        let bg = style.bg.or(cell.style().bg);
        *cell = Cell::new(ch).with_style(CellStyle { bg, ..style });
    }
}

/// Draw text lines inside `content`, truncating what does not fit.
fn draw_lines(frame: &mut Frame, content: Rect, lines: &[TextLine], justify: TextJustify) {
    for (row, line) in lines.iter().enumerate() {
        let y = content.y + row as i32;
        if y >= content.bottom() {
            break;
        }
        let slack = content.width - line.width;
        let indent = match justify {
            TextJustify::Left => 0,
            TextJustify::Center => halve_integer(slack).0,
            TextJustify::Right => slack,
        }
        .max(0);
        let mut x = content.x + indent;
        for span in &line.spans {
            x += frame.draw_str(x, y, &span.text, span.style, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::element::{Container, Element, Node, Text};
    use crate::layout::Edges;
    use crate::style::{Direction, Size, StyleFragment};

    fn render(root: impl Into<Element>, w: u16, h: u16) -> Frame {
        let tree = LayoutTree::compute(&root.into(), Rect::from_size(w, h)).unwrap();
        let mut frame = Frame::new(w, h);
        paint(&tree, &mut frame);
        frame
    }

    #[test]
    fn test_bordered_box_with_text() {
        let root = Container::new(
            StyleFragment::new()
                .with_border(BorderKind::Rounded)
                .with_width(Size::Cells(4))
                .with_height(Size::Cells(1)),
        )
        .child(Element::text("hi"));
        let frame = render(root, 6, 3);
        assert_eq!(frame.to_text(), "╭────╮\n│hi  │\n╰────╯");
    }

    #[test]
    fn test_partial_sides_skip_corners() {
        let mut frame = Frame::new(4, 3);
        let sides = BorderSides::TOP | BorderSides::LEFT;
        draw_border(&mut frame, Rect::new(0, 0, 4, 3), BorderKind::Light, sides, CellStyle::DEFAULT);
        assert_eq!(frame.to_text(), "┌───\n│   \n│   ");
    }

    #[test]
    fn test_text_justification_and_truncation() {
        let text = |justify| {
            Node::from(
                Text::new("ab\ncd\nef")
                    .with_style(StyleFragment::new().with_text_justify(justify).with_height(Size::Cells(2))),
            )
        };
        let root = Container::new(StyleFragment::new().with_width(Size::Cells(6)))
            .child(text(TextJustify::Left))
            .child(text(TextJustify::Center))
            .child(text(TextJustify::Right));
        let frame = render(root, 6, 6);
        assert_eq!(
            frame.to_text(),
            "ab    \ncd    \n  ab  \n  cd  \n    ab\n    cd"
        );
    }

    #[test]
    fn test_backgrounds_and_overwrite_order() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let root = Container::new(
            StyleFragment::new()
                .with_direction(Direction::Row)
                .with_margin(Edges::all(1))
                .with_margin_background(red)
                .with_background(blue)
                .with_height(Size::Cells(1)),
        )
        .child(Element::text("x"));
        let frame = render(root, 4, 3);
        assert_eq!(frame.get(0, 0).unwrap().style().bg, Some(red));
        let x = frame.get(1, 1).unwrap();
        assert_eq!(x.ch(), 'x');
        assert_eq!(x.style().bg, Some(blue));
    }

    #[test]
    fn test_negative_extents_do_not_panic() {
        let root = Container::new(StyleFragment::new().with_direction(Direction::Row).with_width(Size::Cells(2)))
            .child(Container::new(StyleFragment::new().with_width(Size::Cells(5)).with_border(BorderKind::Heavy)))
            .child(Container::new(StyleFragment::new().with_width(Size::Weight(1)).with_border(BorderKind::Light)));
        let frame = render(root, 2, 2);
        assert_eq!(frame.char_at(0, 0), Some('┏'));
    }

    #[test]
    fn test_huge_border_is_clipped_to_frame() {
        let mut frame = Frame::new(3, 2);
        let rect = Rect::new(-1_000_000_000, -5, 2_000_000_000, 1_000_000_000);
        draw_border(&mut frame, rect, BorderKind::Light, BorderSides::ALL, CellStyle::DEFAULT);
        assert_eq!(frame.to_text(), "   \n   ");

        let rect = Rect::new(1, 0, i32::MAX - 1, 2);
        draw_border(&mut frame, rect, BorderKind::Light, BorderSides::ALL, CellStyle::DEFAULT);
        assert_eq!(frame.to_text(), " ┌─\n └─");
    }
}
