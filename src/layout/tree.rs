//! `LayoutTree`: the positioned box tree computed from a concrete element tree.
//!
//! Boxes live in a flat arena in pre-order, so a parent always precedes its
//! children. That makes both passes plain loops:
//!
//! 1. **Sizing** walks the arena backwards (children before parents) and
//!    computes each box's intrinsic outer size.
//! 2. **Positioning** walks it forwards (parents before children), splits
//!    each container's content box among its children and assigns the
//!    margin, border, padding and content rectangles.
//!
//! Nothing is clamped: an over-constrained container hands out negative
//! free space and children may end up with empty or negative extents.

use super::partition::{halve_integer, partition_int, PartitionError};
use super::rect::{Edges, Rect};
use crate::buffer::CellStyle;
use crate::element::{Element, Handlers, Node, Text};
use crate::style::{merge, Align, AnchorEdge, Direction, Justify, Position, Size, StyleFragment};
use unicode_width::UnicodeWidthStr;

/// Index of a box in a [`LayoutTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoxId(pub usize);

/// A styled piece of one text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Span text (no line breaks).
    pub text: String,
    /// Resolved cell style.
    pub style: CellStyle,
}

/// One unwrapped line of a text box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLine {
    /// Spans in drawing order.
    pub spans: Vec<TextSpan>,
    /// Total display width in columns.
    pub width: i32,
}

/// What a box draws besides its background and border.
#[derive(Debug, Clone)]
pub enum BoxContent {
    /// A container and its handlers.
    Container(Handlers),
    /// Lines of text.
    Text(Vec<TextLine>),
}

/// A positioned box.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// Enclosing box (`None` for the root).
    pub parent: Option<BoxId>,
    /// Child boxes in element order.
    pub children: Vec<BoxId>,
    /// Child indices leading from the root element to this one.
    pub path: Vec<usize>,
    /// Element style.
    pub style: StyleFragment,
    /// Container handlers or text lines.
    pub content: BoxContent,
    /// Intrinsic outer size `(width, height)` from the sizing pass.
    pub intrinsic: (i32, i32),
    /// Outer rectangle, margins included.
    pub margin_rect: Rect,
    /// Margin rectangle minus margins.
    pub border_rect: Rect,
    /// Border rectangle minus the border.
    pub padding_rect: Rect,
    /// Padding rectangle minus padding.
    pub content_rect: Rect,
}

impl LayoutBox {
    /// Handlers, for container boxes.
    pub const fn handlers(&self) -> Option<&Handlers> {
        match &self.content {
            BoxContent::Container(handlers) => Some(handlers),
            BoxContent::Text(_) => None,
        }
    }

    /// Margin, border and padding combined.
    fn edges(&self) -> Edges {
        self.style
            .margin()
            .plus(self.style.border_edges())
            .plus(self.style.padding())
    }

    /// Outer extent along `axis` for a fixed-size box: the declared
    /// content size plus margin, border and padding.
    fn fixed_extent(&self, axis: Direction) -> Option<i32> {
        let Size::Cells(n) = self.style.size_along(axis) else {
            return None;
        };
        let edges = self.edges();
        Some(match axis {
            Direction::Row => n + edges.horizontal(),
            Direction::Column => n + edges.vertical(),
        })
    }

    fn in_flow(&self) -> bool {
        matches!(self.style.position(), Position::Static | Position::Relative)
    }
}

/// The positioned box tree for one frame.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
    viewport: Rect,
}

/// Split a `(width, height)` pair into `(main, cross)` for `dir`.
const fn main_cross(dir: Direction, (w, h): (i32, i32)) -> (i32, i32) {
    match dir {
        Direction::Row => (w, h),
        Direction::Column => (h, w),
    }
}

/// Rebuild a rectangle from main/cross-axis coordinates.
const fn rect_from_axes(dir: Direction, main: (i32, i32), cross: (i32, i32)) -> Rect {
    match dir {
        Direction::Row => Rect::new(main.0, cross.0, main.1, cross.1),
        Direction::Column => Rect::new(cross.0, main.0, cross.1, main.1),
    }
}

/// Split text runs into lines, resolving each run's style over the text style.
fn text_lines(text: &Text) -> Vec<TextLine> {
    let mut lines = vec![TextLine::default()];
    for run in &text.runs {
        let style = merge(&text.style, &run.style).text_style();
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(TextLine::default());
            }
            if piece.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.width += piece.width() as i32;
                line.spans.push(TextSpan {
                    text: piece.to_string(),
                    style,
                });
            }
        }
    }
    lines
}

impl LayoutTree {
    /// Lay out `root` inside `viewport`.
    ///
    /// The root is placed as the only child of a virtual column container
    /// filling the viewport, so it stretches horizontally and sizes its
    /// height like any other child.
    ///
    /// # Errors
    ///
    /// Fails if a container's weighted children carry negative weights or
    /// weights summing to zero.
    pub fn compute(root: &Element, viewport: Rect) -> Result<Self, PartitionError> {
        let mut tree = Self {
            boxes: Vec::new(),
            viewport,
        };
        tree.push(root, None, Vec::new());
        tree.size_boxes();
        tree.place_children(viewport, &StyleFragment::new(), &[BoxId(0)])?;
        for i in 0..tree.boxes.len() {
            if tree.boxes[i].children.is_empty() {
                continue;
            }
            let content = tree.boxes[i].content_rect;
            let style = tree.boxes[i].style.clone();
            let children = tree.boxes[i].children.clone();
            tree.place_children(content, &style, &children)?;
        }
        Ok(tree)
    }

    /// The viewport the tree was laid out in.
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True for a tree that was never computed.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Look up a box.
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// All boxes in pre-order (paint order).
    pub fn boxes(&self) -> &[LayoutBox] {
        &self.boxes
    }

    /// Boxes whose border rectangle contains `(x, y)`, innermost and
    /// last-painted first.
    pub fn hit_test(&self, x: i32, y: i32) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .rev()
            .filter(move |(_, b)| b.border_rect.contains(x, y))
            .map(|(i, _)| BoxId(i))
    }

    /// Boxes with a key handler, most specific first.
    pub fn key_targets(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, b)| b.handlers().is_some_and(|h| h.on_key.is_some()))
            .map(|(i, _)| BoxId(i))
    }

    fn push(&mut self, element: &Element, parent: Option<BoxId>, path: Vec<usize>) {
        let id = BoxId(self.boxes.len());
        let (content, children): (BoxContent, &[Node]) = match element {
            Element::Container(c) => (
                BoxContent::Container(c.handlers.clone()),
                c.children.as_slice(),
            ),
            Element::Text(t) => (BoxContent::Text(text_lines(t)), [].as_slice()),
        };
        self.boxes.push(LayoutBox {
            parent,
            children: Vec::new(),
            path: path.clone(),
            style: element.style().clone(),
            content,
            intrinsic: (0, 0),
            margin_rect: Rect::ZERO,
            border_rect: Rect::ZERO,
            padding_rect: Rect::ZERO,
            content_rect: Rect::ZERO,
        });
        if let Some(parent) = parent {
            self.boxes[parent.0].children.push(id);
        }
        for (i, child) in children.iter().enumerate() {
            match child {
                Node::Element(element) => {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    self.push(element, Some(id), child_path);
                }
                Node::Component(component) => {
                    tracing::warn!(key = ?component.key(), "unresolved component in layout input");
                }
            }
        }
    }

    /// Bottom-up intrinsic sizing.
    fn size_boxes(&mut self) {
        for i in (0..self.boxes.len()).rev() {
            let b = &self.boxes[i];
            let (content_w, content_h) = match &b.content {
                BoxContent::Text(lines) => {
                    let width = lines.iter().map(|l| l.width).max().unwrap_or(0);
                    (width, lines.len() as i32)
                }
                BoxContent::Container(_) => {
                    let dir = b.style.direction();
                    let mut main = 0;
                    let mut cross = 0;
                    let mut count = 0;
                    for child in b.children.iter().map(|c| &self.boxes[c.0]) {
                        if !child.in_flow() {
                            continue;
                        }
                        let (m, c) = main_cross(dir, child.intrinsic);
                        main += m;
                        cross = cross.max(c);
                        count += 1;
                    }
                    if count > 0 {
                        main += b.style.gap() * (count - 1);
                    }
                    let r = rect_from_axes(dir, (0, main), (0, cross));
                    (r.width, r.height)
                }
            };
            let edges = b.edges();
            let width = b
                .fixed_extent(Direction::Row)
                .unwrap_or(content_w + edges.horizontal());
            let height = b
                .fixed_extent(Direction::Column)
                .unwrap_or(content_h + edges.vertical());
            self.boxes[i].intrinsic = (width, height);
        }
    }

    /// Position `children` inside `content`, a container box styled by `style`.
    fn place_children(
        &mut self,
        content: Rect,
        style: &StyleFragment,
        children: &[BoxId],
    ) -> Result<(), PartitionError> {
        let dir = style.direction();
        let (main_start, cross_start) = main_cross(dir, (content.x, content.y));
        let (main_len, cross_len) = main_cross(dir, (content.width, content.height));
        let gap = style.gap();

        let flow: Vec<BoxId> = children
            .iter()
            .copied()
            .filter(|c| self.boxes[c.0].in_flow())
            .collect();
        let n = flow.len();

        // Main-axis sizes: fixed and auto children first, then weighted shares.
        let mut sizes = Vec::with_capacity(n);
        let mut weights = Vec::new();
        let mut weighted = Vec::new();
        let mut fixed = 0;
        for (k, id) in flow.iter().enumerate() {
            let child = &self.boxes[id.0];
            if let Size::Weight(w) = child.style.size_along(dir) {
                weights.push(w);
                weighted.push(k);
                sizes.push(0);
            } else {
                let (main, _) = main_cross(dir, child.intrinsic);
                fixed += main;
                sizes.push(main);
            }
        }
        let gaps = if n > 0 { gap * (n as i32 - 1) } else { 0 };
        let free = main_len - fixed - gaps;
        let leftover = if weights.is_empty() {
            free
        } else {
            for (k, share) in weighted.iter().zip(partition_int(free, &weights)?) {
                sizes[*k] = share;
            }
            0
        };

        let (lead, between) = justify_offsets(style.justify(), leftover, n)?;
        let align_items = style.align_items();
        let mut cursor = main_start + lead;
        for (k, id) in flow.iter().enumerate() {
            let child = &self.boxes[id.0];
            let align = child.style.align_self().unwrap_or(align_items);
            let (_, intrinsic_cross) = main_cross(dir, child.intrinsic);
            let cross_size = match (align, child.fixed_extent(dir.cross())) {
                (_, Some(c)) => c,
                (Align::Stretch, None) => cross_len,
                (_, None) => intrinsic_cross,
            };
            let cross_offset = match align {
                Align::Start | Align::Stretch => 0,
                Align::End => cross_len - cross_size,
                Align::Center => halve_integer(cross_len - cross_size).0,
            };
            let mut outer = rect_from_axes(
                dir,
                (cursor, sizes[k]),
                (cross_start + cross_offset, cross_size),
            );
            if child.style.position() == Position::Relative {
                let (dx, dy) = child.style.offset();
                outer = outer.offset(dx, dy);
            }
            self.assign(*id, outer);
            cursor += sizes[k] + gap + between.get(k).copied().unwrap_or(0);
        }

        for id in children.iter().copied().filter(|c| !flow.contains(c)) {
            let child = &self.boxes[id.0];
            let frame = if child.style.position() == Position::Fixed {
                self.viewport
            } else {
                content
            };
            let (width, height) = child.intrinsic;
            let (horizontal, vertical) = child.style.anchor().edges();
            let (dx, dy) = child.style.offset();
            let x = frame.x + anchor_offset(horizontal, frame.width, width) + dx;
            let y = frame.y + anchor_offset(vertical, frame.height, height) + dy;
            self.assign(id, Rect::new(x, y, width, height));
        }
        Ok(())
    }

    /// Derive all four rectangles of a box from its outer rectangle.
    fn assign(&mut self, id: BoxId, outer: Rect) {
        let b = &mut self.boxes[id.0];
        b.margin_rect = outer;
        b.border_rect = outer.shrink(b.style.margin());
        b.padding_rect = b.border_rect.shrink(b.style.border_edges());
        b.content_rect = b.padding_rect.shrink(b.style.padding());
    }
}

fn anchor_offset(edge: AnchorEdge, available: i32, size: i32) -> i32 {
    match edge {
        AnchorEdge::Start => 0,
        AnchorEdge::Middle => halve_integer(available - size).0,
        AnchorEdge::End => available - size,
    }
}

/// Leading offset and the extra space after each of the first `n - 1`
/// children for a main-axis distribution of `leftover` cells.
fn justify_offsets(
    justify: Justify,
    leftover: i32,
    n: usize,
) -> Result<(i32, Vec<i32>), PartitionError> {
    let none = vec![0; n.saturating_sub(1)];
    let spare = leftover.max(0);
    Ok(match justify {
        Justify::End => (leftover, none),
        Justify::Center => (halve_integer(leftover).0, none),
        Justify::SpaceBetween if n > 1 => (0, partition_int(spare, &vec![1; n - 1])?),
        Justify::SpaceAround if n > 0 => {
            let mut weights = vec![2; n + 1];
            weights[0] = 1;
            weights[n] = 1;
            let parts = partition_int(spare, &weights)?;
            (parts[0], parts[1..n].to_vec())
        }
        Justify::SpaceEvenly if n > 0 => {
            let parts = partition_int(spare, &vec![1; n + 1])?;
            (parts[0], parts[1..n].to_vec())
        }
        _ => (0, none),
    })
}
