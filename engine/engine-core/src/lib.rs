//! Core traits and types for the jigsaw search engine
//!
//! This crate provides the abstractions the tree search needs from a game:
//! - `Game`: typed state contract (terminal test, legal actions, transition, rollout)
//! - `Solver`: action selection shared by the search and exact tables
//! - `game_utils`: random playouts and outcome constants shared by game implementations

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use game_utils::{pick_uniform, random_playout, FAILURE, SUCCESS};
pub use typed::{ActionId, Game, Solver};
