//! Layout and paint benchmark: a dashboard-like grid of bordered panels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis::buffer::Frame;
use trellis::paint::{paint, Healer};
use trellis::{BorderKind, Container, Direction, Element, LayoutTree, Rect, Size, StyleFragment, Text};

fn panel(i: usize) -> Container {
    Container::new(
        StyleFragment::new()
            .with_width(Size::Weight(1))
            .with_border(BorderKind::Light),
    )
    .child(Text::new(format!("panel {i}")))
    .child(Text::new("load 0.42  mem 61%"))
}

/// `rows` rows of `cols` weighted, bordered panels sharing edges.
fn grid(rows: usize, cols: usize) -> Element {
    Container::new(StyleFragment::new().with_gap(-1))
        .children((0..rows).map(|r| {
            Container::new(
                StyleFragment::new()
                    .with_direction(Direction::Row)
                    .with_height(Size::Weight(1))
                    .with_gap(-1),
            )
            .children((0..cols).map(move |c| panel(r * cols + c)))
        }))
        .into()
}

fn layout_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_grid");
    let viewport = Rect::new(0, 0, 200, 50);

    for (rows, cols) in [(2, 2), (4, 6), (8, 12)] {
        let root = grid(rows, cols);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &root,
            |b, root| b.iter(|| LayoutTree::compute(black_box(root), viewport)),
        );
    }

    group.finish();
}

fn paint_and_heal(c: &mut Criterion) {
    let root = grid(4, 6);
    let Ok(tree) = LayoutTree::compute(&root, Rect::new(0, 0, 200, 50)) else {
        return;
    };

    c.bench_function("paint_200x50_4x6", |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 50);
            paint(black_box(&tree), &mut frame);
            frame
        });
    });

    let mut healer = Healer::new();
    c.bench_function("paint_heal_200x50_4x6", |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 50);
            paint(black_box(&tree), &mut frame);
            healer.heal(&mut frame, &tree)
        });
    });
}

criterion_group!(benches, layout_grid, paint_and_heal);
criterion_main!(benches);
