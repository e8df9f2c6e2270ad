//! Configuration for the player binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_games() -> u32 {
    CENTRAL_CONFIG.player.games
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.iterations
}

fn default_max_depth() -> u32 {
    CENTRAL_CONFIG.mcts.max_depth
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.player.seed
}

fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.mcts.time_budget_ms
}

fn default_max_rounds() -> u32 {
    CENTRAL_CONFIG.player.max_rounds
}

fn default_placer() -> PlacerKind {
    // Unknown names fall back to the search engine
    PlacerKind::from_str(&CENTRAL_CONFIG.player.placer, true).unwrap_or(PlacerKind::Mcts)
}

fn default_compare() -> bool {
    CENTRAL_CONFIG.player.compare
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

/// Who decides the placer's moves.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacerKind {
    /// Monte Carlo Tree Search with random rollouts
    Mcts,
    /// Lookup in the exact expected-rolls table
    Exact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "player")]
#[command(about = "Jigsaw player - random revealer against an MCTS or exact placer")]
#[command(
    long_about = "Plays complete jigsaw games. Each round a random revealer picks a
piece and the placer decides where to place it, or skips. The placer is
the MCTS engine or the exact expected-rolls table; --compare scores every
MCTS placement against that table.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// MCTS iterations per decision
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// Rollout lookahead in actions, measured from the decision point
    #[arg(long, default_value_t = default_max_depth())]
    pub max_depth: u32,

    /// UCB exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Base seed for the revealer and the engine (0 draws one from the OS)
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Wall-clock cap per decision in milliseconds (0 to disable)
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Give up on a game after this many rounds
    #[arg(long, default_value_t = default_max_rounds())]
    pub max_rounds: u32,

    /// Who places the pieces
    #[arg(long, value_enum, default_value_t = default_placer())]
    pub placer: PlacerKind,

    /// Score every MCTS placement against the exact table
    #[arg(long, default_value_t = default_compare())]
    pub compare: bool,

    /// Do not print the board after every reveal
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            ));
        }

        if self.max_rounds == 0 {
            return Err(anyhow!("max_rounds must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Explicit seed, `None` when the OS should pick one.
    pub fn seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }

    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }

    /// Whether games need the exact expected-rolls table.
    pub fn needs_exact_table(&self) -> bool {
        self.placer == PlacerKind::Exact || self.compare
    }

    /// Whether boards are printed, combining config.toml and `--quiet`.
    pub fn render(&self) -> bool {
        CENTRAL_CONFIG.player.render && !self.quiet
    }

    /// Engine settings for the placer.
    pub fn mcts_config(&self) -> mcts::MctsConfig {
        let mut config = mcts::MctsConfig::default()
            .with_iterations(self.iterations)
            .with_max_depth(self.max_depth)
            .with_exploration(self.exploration);

        if let Some(seed) = self.seed() {
            config = config.with_seed(seed);
        }
        if let Some(budget) = self.time_budget() {
            config = config.with_time_budget(budget);
        }

        config
    }
}
