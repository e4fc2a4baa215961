//! Frame differ benchmark: diff two frames and encode the change set.
//!
//! Target: < 500µs for a fully changed 200×50 frame

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis::buffer::{diff_frames, Cell, Frame, Rgb};
use trellis::terminal::OutputBuffer;

/// A frame with varied characters and colours.
fn create_test_frame(width: u16, height: u16, seed: u8) -> Frame {
    let mut frame = Frame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = ((x + y + u16::from(seed)) % 26 + 65) as u8 as char;
            let cell = Cell::new(c)
                .with_fg(Rgb::new(
                    ((x * 3 + u16::from(seed)) % 256) as u8,
                    ((y * 7 + u16::from(seed)) % 256) as u8,
                    ((x + y + u16::from(seed)) % 256) as u8,
                ))
                .with_bg(Rgb::new(20, 20, 30));
            frame.set(i32::from(x), i32::from(y), cell);
        }
    }
    frame
}

fn diff_and_encode(previous: &Frame, next: &Frame) -> usize {
    let changes = diff_frames(previous, next);
    let mut output = OutputBuffer::with_capacity(65536);
    changes.encode(&mut output).cells_changed
}

fn diff_identical_frames(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);
    let copy = frame.clone();

    c.bench_function("diff_200x50_identical", |b| {
        b.iter(|| diff_and_encode(black_box(&frame), black_box(&copy)));
    });
}

fn diff_single_cell_change(c: &mut Criterion) {
    let a = create_test_frame(200, 50, 0);
    let mut b_frame = a.clone();
    b_frame.set(100, 25, Cell::new('X').with_fg(Rgb::new(255, 0, 0)));

    c.bench_function("diff_200x50_single_change", |b| {
        b.iter(|| diff_and_encode(black_box(&a), black_box(&b_frame)));
    });
}

fn diff_line_change(c: &mut Criterion) {
    let a = create_test_frame(200, 50, 0);
    let mut b_frame = a.clone();
    for x in 0..200 {
        b_frame.set(x, 25, Cell::new('*').with_fg(Rgb::new(255, 255, 0)));
    }

    c.bench_function("diff_200x50_line_change", |b| {
        b.iter(|| diff_and_encode(black_box(&a), black_box(&b_frame)));
    });
}

fn first_frame(c: &mut Criterion) {
    let blank = Frame::new(200, 50);
    let frame = create_test_frame(200, 50, 0);

    c.bench_function("diff_200x50_from_blank", |b| {
        b.iter(|| diff_and_encode(black_box(&blank), black_box(&frame)));
    });
}

fn diff_various_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let a = create_test_frame(width, height, 0);
        let b_frame = create_test_frame(width, height, 1);

        group.bench_with_input(
            BenchmarkId::new("full_change", format!("{width}x{height}")),
            &(a, b_frame),
            |b, (a, bb)| b.iter(|| diff_and_encode(black_box(a), black_box(bb))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    diff_identical_frames,
    diff_single_cell_change,
    diff_line_change,
    first_frame,
    diff_various_sizes,
);
criterion_main!(benches);
