//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full MCTS search with varying iteration counts
//! - Search from different positions (opening, half full, nearly complete)
//! - Tree operations (expansion, selection, backpropagation)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_jigsaw::{State, FULL_BOARD};
use mcts::{run_mcts, MctsConfig, MctsTree, RolloutEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    let evaluator = RolloutEvaluator::new();
    let state = State::with_piece(0, 4).unwrap();

    for iterations in [100u32, 1_000, 10_000] {
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("square_empty_board", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::default().with_iterations(iterations);
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                b.iter(|| black_box(run_mcts(&state, &evaluator, config.clone(), &mut rng)))
            },
        );
    }

    group.finish();
}

fn bench_mcts_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_positions");
    let evaluator = RolloutEvaluator::new();
    let config = MctsConfig::default().with_iterations(2_000);

    let positions = [
        ("opening", State::new()),
        (
            "half_full",
            State::with_piece(0b111111_111100_110000_000000, 2).unwrap(),
        ),
        (
            "nearly_complete",
            State::with_piece(FULL_BOARD & !0b11, 0).unwrap(),
        ),
    ];

    for (name, state) in positions {
        group.bench_function(name, |b| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| black_box(run_mcts(&state, &evaluator, config.clone(), &mut rng)))
        });
    }

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    group.bench_function("expand_all_root_children", |b| {
        let state = State::with_piece(0, 0).unwrap();
        b.iter(|| {
            let mut tree = MctsTree::new(state);
            while tree.expand(tree.root()).is_some() {}
            black_box(tree.len())
        })
    });

    group.bench_function("best_action_25_children", |b| {
        let mut tree = MctsTree::new(State::with_piece(0, 0).unwrap());
        while let Some(child) = tree.expand(tree.root()) {
            tree.backpropagate(child, f64::from(tree.len() as u32 % 2));
        }
        b.iter(|| black_box(tree.best_action(tree.root(), 1.0)))
    });

    group.bench_function("backpropagate_depth_8", |b| {
        let mut tree = MctsTree::new(State::new());
        let mut leaf = tree.root();
        for _ in 0..8 {
            leaf = tree.expand(leaf).unwrap();
        }
        b.iter(|| tree.backpropagate(black_box(leaf), 1.0))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_iterations,
    bench_mcts_positions,
    bench_tree_operations,
);
criterion_main!(benches);
