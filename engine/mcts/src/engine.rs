//! Reusable decision maker.
//!
//! [`MctsEngine`] owns a validated configuration, an evaluator and the RNG
//! that drives its rollouts. Each call builds a fresh tree, searches it and
//! throws it away; only the RNG carries over between decisions, so a seeded
//! engine replays the same sequence of decisions.

use engine_core::{ActionId, Game, Solver};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::{ConfigError, MctsConfig};
use crate::evaluator::{Evaluator, RolloutEvaluator};
use crate::search::{MctsSearch, SearchProgress, SearchResult};

/// Monte Carlo Tree Search decision engine.
#[derive(Debug)]
pub struct MctsEngine<E = RolloutEvaluator> {
    config: MctsConfig,
    evaluator: E,
    rng: ChaCha20Rng,
}

impl MctsEngine {
    /// Engine with random rollouts as the leaf evaluation.
    pub fn new(config: MctsConfig) -> Result<Self, ConfigError> {
        Self::with_evaluator(config, RolloutEvaluator)
    }
}

impl<E> MctsEngine<E> {
    /// Engine with a custom leaf evaluator.
    pub fn with_evaluator(config: MctsConfig, evaluator: E) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        debug!(
            iterations = config.iterations,
            max_depth = config.max_depth,
            exploration = config.exploration,
            seeded = config.seed.is_some(),
            "MCTS engine created"
        );

        Ok(Self {
            config,
            evaluator,
            rng,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Restart the rollout RNG from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    /// Best action for the agent to move in `state`.
    ///
    /// Returns `None` when `state` is terminal.
    pub fn search<G: Game>(&mut self, state: &G) -> Option<ActionId>
    where
        E: Evaluator<G>,
    {
        self.run(state).action
    }

    /// Like [`search`](Self::search), with the full root statistics.
    pub fn run<G: Game>(&mut self, state: &G) -> SearchResult
    where
        E: Evaluator<G>,
    {
        MctsSearch::new(state, &self.evaluator, self.config.clone()).run(&mut self.rng)
    }

    /// Like [`run`](Self::run), reporting progress every `interval` iterations.
    pub fn run_with_progress<G: Game, F>(
        &mut self,
        state: &G,
        interval: u32,
        on_progress: F,
    ) -> SearchResult
    where
        E: Evaluator<G>,
        F: FnMut(&SearchProgress),
    {
        MctsSearch::new(state, &self.evaluator, self.config.clone()).run_with_progress(
            &mut self.rng,
            interval,
            on_progress,
        )
    }
}

impl<G: Game, E: Evaluator<G>> Solver<G> for MctsEngine<E> {
    fn solve(&mut self, state: &G) -> Option<ActionId> {
        self.search(state)
    }
}
