//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so the binary and the
//! documentation shipped next to it always agree on the values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    player: PlayerDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    max_depth: u32,
    exploration: f64,
    time_budget_ms: u64,
}

#[derive(Debug, Deserialize)]
struct PlayerDefaults {
    games: u32,
    seed: u64,
    max_rounds: u32,
    render: bool,
    placer: String,
    compare: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn max_depth() -> u32 {
    DEFAULTS.mcts.max_depth
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.mcts.time_budget_ms
}

// Player
pub fn games() -> u32 {
    DEFAULTS.player.games
}
pub fn seed() -> u64 {
    DEFAULTS.player.seed
}
pub fn max_rounds() -> u32 {
    DEFAULTS.player.max_rounds
}
pub fn render() -> bool {
    DEFAULTS.player.render
}
pub fn placer() -> &'static str {
    &DEFAULTS.player.placer
}
pub fn compare() -> bool {
    DEFAULTS.player.compare
}
