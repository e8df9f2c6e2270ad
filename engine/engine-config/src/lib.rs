//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the workspace (the MCTS engine settings and the player binary).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`JIGSAW_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! JIGSAW_<SECTION>_<KEY>=value
//!
//! Examples:
//!     JIGSAW_COMMON_LOG_LEVEL=debug
//!     JIGSAW_MCTS_ITERATIONS=20000
//!     JIGSAW_MCTS_EXPLORATION=1.4
//!     JIGSAW_PLAYER_GAMES=10
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
