//! Puzzle hot-path benchmarks.
//!
//! Run with: `cargo bench -p games-jigsaw`
//!
//! Legal-action enumeration and rollouts are called on every expansion and
//! every simulation step of the search, so they dominate search time.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine_core::Game;
use games_jigsaw::{ExactSolver, State, PIECE_COUNT};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_legal_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_actions");

    group.bench_function("revealer", |b| {
        let state = State::new();
        b.iter(|| black_box(state.legal_actions()))
    });

    for piece in 0..PIECE_COUNT as u8 {
        let state = State::with_piece(0b100000_110000_000011_000000, piece).unwrap();
        group.bench_function(format!("placer_piece_{piece}"), |b| {
            b.iter(|| black_box(state.legal_actions()))
        });
    }

    group.finish();
}

fn bench_rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout");

    for max_depth in [5u32, 15, 40] {
        group.bench_function(format!("empty_board_depth_{max_depth}"), |b| {
            let state = State::new();
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| black_box(state.rollout(max_depth, &mut rng)))
        });
    }

    group.finish();
}

fn bench_exact_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_solver");
    group.sample_size(10);

    // Bottom two rows empty
    let base = 0b111111_111111_000000_000000;
    group.bench_function("build_12_free_cells", |b| {
        b.iter(|| black_box(ExactSolver::new(base).unwrap().boards()))
    });

    let solver = ExactSolver::new(base).unwrap();
    group.bench_function("choices", |b| {
        b.iter(|| black_box(solver.choices(black_box(base | 0b101))))
    });

    group.finish();
}

criterion_group!(benches, bench_legal_actions, bench_rollout, bench_exact_solver);
criterion_main!(benches);
