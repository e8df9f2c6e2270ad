//! Evaluator trait for leaf evaluation.
//!
//! The evaluator scores a freshly expanded node. The default is a uniform
//! random rollout through [`Game::rollout`]; tests plug in fixed scores to
//! check the tree bookkeeping in isolation.

use engine_core::Game;
use rand_chacha::ChaCha20Rng;

/// Trait for leaf evaluators.
///
/// Implementations could be:
/// - RolloutEvaluator: Random playout until the game ends or the budget runs out
/// - Fixed or heuristic scores for testing
pub trait Evaluator<G: Game> {
    /// Score `state` in `[0, 1]` from the placer's point of view.
    ///
    /// `max_depth` is the number of actions the evaluation may look ahead.
    /// Terminal states are evaluated with a budget of 0.
    fn evaluate(&self, state: &G, max_depth: u32, rng: &mut ChaCha20Rng) -> f64;
}

/// Uniform random rollout, the classic MCTS simulation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloutEvaluator;

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> Evaluator<G> for RolloutEvaluator {
    fn evaluate(&self, state: &G, max_depth: u32, rng: &mut ChaCha20Rng) -> f64 {
        state.rollout(max_depth, rng)
    }
}
