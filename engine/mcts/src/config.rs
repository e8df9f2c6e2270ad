//! MCTS configuration parameters.

use std::time::Duration;
use thiserror::Error;

/// Configuration rejected before any search runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("iterations must be greater than 0")]
    ZeroIterations,

    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("time budget must be greater than 0 when set")]
    ZeroTimeBudget,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of select/expand/simulate/backpropagate iterations per search.
    pub iterations: u32,

    /// Rollout lookahead, in actions, measured from the search root.
    /// A node at depth `d` gets `max_depth - d` actions for its rollout.
    pub max_depth: u32,

    /// Exploration constant `c` in the UCB formula.
    /// 0.0 = pure exploitation. The final decision always uses 0.0.
    pub exploration: f64,

    /// Seed for the rollout RNG. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Optional wall-clock cap, checked once per iteration.
    /// The search stops at whichever of `iterations` or this comes first.
    pub time_budget: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            max_depth: 15,
            exploration: 1.0,
            seed: None,
            time_budget: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, seeded config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 500,
            max_depth: 15,
            exploration: 1.0,
            seed: Some(42),
            time_budget: None,
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set rollout lookahead.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder pattern: set exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: set wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Check the configuration before a search uses it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::InvalidExploration(self.exploration));
        }

        if self.time_budget == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeBudget);
        }

        Ok(())
    }
}
