//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse fully expanded nodes using UCB to find a leaf
//! 2. Expansion: Add one child for an unexplored action
//! 3. Evaluation: Roll out from the new child within the remaining budget
//! 4. Backpropagation: Update statistics along the path

use std::time::{Duration, Instant};

use engine_core::{ActionId, Game};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::evaluator::Evaluator;
use crate::node::NodeId;
use crate::tree::{ChildStats, MctsTree, TreeStats};

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best action to take, `None` when the root state is already terminal
    pub action: Option<ActionId>,

    /// Mean outcome at the root
    pub value: f64,

    /// Number of iterations performed
    pub iterations: u32,

    /// Per-action statistics at the root, sorted by action
    pub children: Vec<ChildStats>,

    /// Shape of the search tree
    pub tree: TreeStats,

    /// Wall-clock time spent searching
    pub elapsed: Duration,
}

/// Snapshot handed to progress callbacks.
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Iterations completed so far
    pub iterations: u32,

    /// Per-action statistics at the root, sorted by action
    pub children: Vec<ChildStats>,
}

impl SearchProgress {
    /// The root child with the most visits; ties go to the smallest action.
    pub fn most_visited(&self) -> Option<&ChildStats> {
        self.children
            .iter()
            .max_by(|a, b| a.visits.cmp(&b.visits).then(b.action.cmp(&a.action)))
    }
}

/// MCTS search state for a single decision.
pub struct MctsSearch<'a, G, E> {
    tree: MctsTree<G>,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, G: Game, E: Evaluator<G>> MctsSearch<'a, G, E> {
    /// Create a new MCTS search rooted at a copy of `state`.
    pub fn new(state: &G, evaluator: &'a E, config: MctsConfig) -> Self {
        Self {
            tree: MctsTree::new(state.clone()),
            evaluator,
            config,
        }
    }

    /// Run the MCTS search for the configured number of iterations.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> SearchResult {
        self.run_with_progress(rng, 0, |_| {})
    }

    /// Run the search, reporting root statistics every `interval` iterations
    /// and once more at the end. An interval of 0 disables reporting.
    pub fn run_with_progress<F>(
        &mut self,
        rng: &mut ChaCha20Rng,
        interval: u32,
        mut on_progress: F,
    ) -> SearchResult
    where
        F: FnMut(&SearchProgress),
    {
        let started = Instant::now();
        let root_id = self.tree.root();

        if self.tree.get(root_id).is_terminal {
            warn!("MCTS called on a terminal state, nothing to decide");
            return self.result(0, started.elapsed());
        }

        let deadline = self.config.time_budget.map(|budget| started + budget);
        let mut completed = 0;

        while completed < self.config.iterations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(completed, "MCTS time budget exhausted");
                break;
            }

            self.iterate(rng);
            completed += 1;

            if interval > 0 && completed % interval == 0 {
                on_progress(&self.progress(completed));
            }
        }

        if interval > 0 && completed % interval != 0 {
            on_progress(&self.progress(completed));
        }

        let result = self.result(completed, started.elapsed());
        debug!(
            iterations = result.iterations,
            nodes = result.tree.total_nodes,
            action = ?result.action,
            value = result.value,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "MCTS search complete"
        );
        result
    }

    /// Run a single iteration (select -> expand -> evaluate -> backpropagate).
    fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let leaf_id = self.select();

        // Terminal leaves and dead ends are evaluated in place
        let node_id = if self.tree.get(leaf_id).is_terminal {
            leaf_id
        } else {
            self.tree.expand(leaf_id).unwrap_or(leaf_id)
        };

        let node = self.tree.get(node_id);
        let budget = if node.is_terminal {
            0
        } else {
            self.config.max_depth.saturating_sub(node.depth)
        };
        let value = self.evaluator.evaluate(&node.state, budget, rng);

        self.tree.backpropagate(node_id, value);

        trace!(
            leaf = leaf_id.0,
            node = node_id.0,
            budget,
            value,
            "MCTS iteration complete"
        );
    }

    /// Select a leaf node by traversing the tree using UCB.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            // Stop at terminal or partially expanded nodes
            if node.is_leaf() {
                return current;
            }

            match self.tree.select_child(current, self.config.exploration) {
                Some(child_id) => current = child_id,
                None => return current, // Fully expanded but no legal actions
            }
        }
    }

    fn progress(&self, iterations: u32) -> SearchProgress {
        SearchProgress {
            iterations,
            children: self.tree.child_stats(self.tree.root()),
        }
    }

    fn result(&self, iterations: u32, elapsed: Duration) -> SearchResult {
        let root_id = self.tree.root();
        let root = self.tree.get(root_id);

        // Final decision is pure exploitation
        let action = if root.children.is_empty() {
            None
        } else {
            Some(self.tree.best_action(root_id, 0.0))
        };

        SearchResult {
            action,
            value: root.mean_value(),
            iterations,
            children: self.tree.child_stats(root_id),
            tree: self.tree.stats(),
            elapsed,
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G> {
        &self.tree
    }
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<G: Game, E: Evaluator<G>>(
    state: &G,
    evaluator: &E,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> SearchResult {
    MctsSearch::new(state, evaluator, config).run(rng)
}
