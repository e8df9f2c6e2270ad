//! Shared utilities for game implementations
//!
//! Random playouts are the only leaf evaluation the search uses, so every
//! game gets the same budgeted playout loop for free through
//! [`Game::rollout`](crate::Game::rollout).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::typed::{ActionId, Game};

/// Outcome of a playout that completed the game within budget.
pub const SUCCESS: f64 = 1.0;

/// Outcome of a playout that ran out of budget or hit a dead end.
pub const FAILURE: f64 = 0.0;

/// Pick one action uniformly at random.
///
/// Returns `None` for an empty slice.
#[inline]
pub fn pick_uniform<R: Rng + ?Sized>(actions: &[ActionId], rng: &mut R) -> Option<ActionId> {
    actions.choose(rng).copied()
}

/// Play random legal actions from `state` until it is terminal or the
/// budget is exhausted.
///
/// The budget counts actions played by this playout, not the absolute depth
/// of the state it starts from. The check happens after each action, so an
/// action that both exceeds the budget and finishes the game still fails.
pub fn random_playout<G, R>(state: &G, max_depth: u32, rng: &mut R) -> f64
where
    G: Game,
    R: Rng + ?Sized,
{
    let mut game = state.clone();
    let start = game.depth();

    while !game.is_terminal() {
        let Some(action) = pick_uniform(&game.legal_actions(), rng) else {
            // Non-terminal state with no moves: the game can never finish.
            return FAILURE;
        };
        game.apply_action(action);

        if game.depth().saturating_sub(start) > max_depth {
            return FAILURE;
        }
    }

    SUCCESS
}
