//! Benchmarks for the move pipeline and complete playouts.
//!
//! Flood-fill capture runs on every placement, so it dominates game cost on
//! large boards.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use conquer::GameOptions;
use conquer::game::{Cell, Grid, Position, capture_regions, evaluate};
use conquer::playout::{default_roster, run_playout};

fn options(size: u16) -> GameOptions {
    GameOptions {
        width: size,
        height: size,
        ..GameOptions::default()
    }
}

fn bench_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("playout_2p");
    for size in [8u16, 16, 32] {
        let opts = options(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &opts, |b, opts| {
            b.iter(|| {
                let result = run_playout(black_box(42), black_box(opts), 2);
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_playout_4p(c: &mut Criterion) {
    let opts = options(16);
    c.bench_function("playout_4p_16", |b| {
        b.iter(|| {
            let result = run_playout(black_box(7), black_box(&opts), 4);
            black_box(result)
        });
    });
}

fn bench_capture_open_board(c: &mut Criterion) {
    // Worst case for a single placement: the fill walks the whole board
    let mut grid = Grid::new(64, 64).unwrap();
    let placed = Position::new(32, 32);
    grid.set(placed, Cell::occupied(1, 1));

    c.bench_function("capture_open_64x64", |b| {
        b.iter(|| {
            let mut grid = grid.clone();
            let mut next_id = 1;
            let result = capture_regions(&mut grid, 1, black_box(placed), 6, 1, &mut next_id);
            black_box(result)
        });
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let roster = default_roster(4);
    let mut grid = Grid::new(64, 64).unwrap();
    for idx in 0..grid.total_cells() / 2 {
        let owner = u8::try_from(idx % 4 + 1).unwrap();
        grid.set(grid.position_of(idx), Cell::occupied(owner, 0));
    }

    c.bench_function("evaluate_64x64", |b| {
        b.iter(|| black_box(evaluate(black_box(&grid), &roster)));
    });
}

criterion_group!(
    benches,
    bench_playout,
    bench_playout_4p,
    bench_capture_open_board,
    bench_evaluate
);
criterion_main!(benches);
