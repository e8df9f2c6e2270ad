//! Monte Carlo Tree Search (MCTS) with random rollouts.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running iterations.
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: Walk down fully expanded nodes using UCB1 to balance
//!    exploration and exploitation
//! 2. **Expansion**: Add a child for one unexplored action of the leaf
//! 3. **Evaluation**: Play uniformly random actions from the new child until
//!    the game ends (1.0) or the depth budget runs out (0.0)
//! 4. **Backpropagation**: Add the outcome to every node on the path back to
//!    the root
//!
//! Once the iterations are spent, the root child with the best mean outcome
//! is chosen. Ties go to the smallest action id.
//!
//! # Usage
//!
//! ```rust
//! use games_jigsaw::{State, SKIP_ACTION};
//! use mcts::{MctsConfig, MctsEngine};
//!
//! let config = MctsConfig::default().with_iterations(500).with_seed(42);
//! let mut engine = MctsEngine::new(config).unwrap();
//!
//! // Placer to move with the single-cell piece on an empty board
//! let state = State::with_piece(0, 0).unwrap();
//! let action = engine.search(&state).unwrap();
//! assert!(action <= SKIP_ACTION);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: Iterations per decision (default: 100000)
//! - `max_depth`: Rollout lookahead measured from the search root (default: 15)
//! - `exploration`: Exploration constant for UCB (default: 1.0)
//! - `seed`: RNG seed for reproducible decisions
//! - `time_budget`: Optional wall-clock cap per decision
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------+
//! |                   MctsEngine                    |
//! |   config + evaluator + ChaCha20Rng (persists)   |
//! +-------------------------------------------------+
//! |                   MctsSearch                    |
//! |  +------------+  +-----------+  +-----------+   |
//! |  |  MctsTree  |  |   Game    |  | Evaluator |   |
//! |  |  (arena)   |  |  (state)  |  | (rollout) |   |
//! |  +------------+  +-----------+  +-----------+   |
//! |                                                 |
//! |  select -> expand -> evaluate -> backpropagate  |
//! +-------------------------------------------------+
//! ```

pub mod config;
pub mod engine;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{ConfigError, MctsConfig};
pub use engine::MctsEngine;
pub use evaluator::{Evaluator, RolloutEvaluator};
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsSearch, SearchProgress, SearchResult};
pub use tree::{ChildStats, MctsTree, TreeStats};
