//! Player - plays jigsaw games with the MCTS engine
//!
//! Each round:
//! 1. A seeded random revealer picks the next piece
//! 2. The board and the revealed piece are printed
//! 3. The placer (MCTS engine or exact table) picks a placement, or skips
//!
//! Games run until the board is covered or `max_rounds` is reached.

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod config;
mod session;

use crate::config::Config;
use crate::session::{RunSummary, Session};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    info!(
        games = config.games,
        iterations = config.iterations,
        max_depth = config.max_depth,
        exploration = config.exploration,
        seed = ?config.seed(),
        placer = ?config.placer,
        compare = config.compare,
        "Starting player"
    );

    let mut session = Session::new(&config)?;
    let mut run = RunSummary::default();

    for game in 1..=config.games {
        let summary = session.play_game(game)?;
        info!(
            game,
            rounds = summary.rounds,
            skips = summary.skips,
            completed = summary.completed,
            fill = format!("{:.2}", summary.fill_ratio),
            expected_rolls = ?summary.expected_rolls,
            "Game finished"
        );
        run.add(&summary);
    }

    run.log_summary();
    Ok(())
}
