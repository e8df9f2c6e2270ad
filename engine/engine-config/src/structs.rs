//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_max_depth() -> u32 {
    defaults::max_depth()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_max_rounds() -> u32 {
    defaults::max_rounds()
}
fn d_render() -> bool {
    defaults::render()
}
fn d_placer() -> String {
    defaults::placer().into()
}
fn d_compare() -> bool {
    defaults::compare()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search engine settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_max_depth")]
    pub max_depth: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// Wall-clock cap per decision in milliseconds, 0 = none
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            max_depth: defaults::max_depth(),
            exploration: defaults::exploration(),
            time_budget_ms: defaults::time_budget_ms(),
        }
    }
}

/// Player binary settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    /// Base seed for the revealer and the engine, 0 = from the OS
    #[serde(default = "d_seed")]
    pub seed: u64,
    /// Safety cap on placer turns per game
    #[serde(default = "d_max_rounds")]
    pub max_rounds: u32,
    /// Print the board after every round
    #[serde(default = "d_render")]
    pub render: bool,
    /// "mcts" or "exact"
    #[serde(default = "d_placer")]
    pub placer: String,
    /// Score MCTS placements against the exact table
    #[serde(default = "d_compare")]
    pub compare: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            seed: defaults::seed(),
            max_rounds: defaults::max_rounds(),
            render: defaults::render(),
            placer: defaults::placer().into(),
            compare: defaults::compare(),
        }
    }
}
