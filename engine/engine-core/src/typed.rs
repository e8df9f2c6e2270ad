//! Typed Game trait consumed by the tree search
//!
//! A game state is a small value type. The search clones it once per
//! expanded node and once per rollout, so implementations should be cheap
//! to copy and must not share mutable substate between copies.

use rand::Rng;
use std::fmt;

use crate::game_utils::random_playout;

/// Integer action identifier. Its meaning depends on whose turn it is.
pub type ActionId = u8;

/// State contract required by the search engine.
///
/// # Example
///
/// ```rust
/// use engine_core::{ActionId, Game};
///
/// /// Count up to three; the only move is "increment".
/// #[derive(Debug, Clone, Default)]
/// struct Counter {
///     value: u8,
///     depth: u32,
/// }
///
/// impl Game for Counter {
///     fn is_terminal(&self) -> bool {
///         self.value == 3
///     }
///
///     fn legal_actions(&self) -> Vec<ActionId> {
///         vec![0]
///     }
///
///     fn apply_action(&mut self, _action: ActionId) {
///         self.value += 1;
///         self.depth += 1;
///     }
///
///     fn depth(&self) -> u32 {
///         self.depth
///     }
/// }
///
/// let mut rng = rand::thread_rng();
/// assert_eq!(Counter::default().rollout(3, &mut rng), 1.0);
/// assert_eq!(Counter::default().rollout(2, &mut rng), 0.0);
/// ```
pub trait Game: Clone + fmt::Debug {
    /// True once the game cannot continue.
    fn is_terminal(&self) -> bool;

    /// Legal actions from this state, in ascending id order.
    ///
    /// The order is part of the contract: the search expands actions in a
    /// fixed order so that a seeded search is reproducible.
    fn legal_actions(&self) -> Vec<ActionId>;

    /// Apply `action` in place. The action must be one of `legal_actions()`.
    fn apply_action(&mut self, action: ActionId);

    /// Number of actions applied since this state's root ancestor.
    fn depth(&self) -> u32;

    /// Randomised playout used as the leaf evaluation.
    ///
    /// Plays uniformly random legal actions on a private copy. Returns
    /// [`SUCCESS`](crate::SUCCESS) if a terminal state is reached having
    /// played at most `max_depth` actions, [`FAILURE`](crate::FAILURE)
    /// otherwise. A state that is already terminal scores `SUCCESS` without
    /// touching the RNG.
    fn rollout<R: Rng + ?Sized>(&self, max_depth: u32, rng: &mut R) -> f64 {
        random_playout(self, max_depth, rng)
    }
}

/// Anything that picks an action for the agent to move.
///
/// Implemented by the tree search and by exact lookup tables, so callers
/// can swap one for the other.
pub trait Solver<G: Game> {
    /// Chosen action, or `None` when this solver has nothing to offer for
    /// `state` (terminal, or outside what it knows about).
    fn solve(&mut self, state: &G) -> Option<ActionId>;
}
