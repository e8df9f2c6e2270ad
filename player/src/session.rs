//! Game loop: random revealer against the placer.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use engine_core::{pick_uniform, ActionId, Solver};
use games_jigsaw::{ExactSolver, State, CELL_COUNT, SKIP_ACTION};
use mcts::MctsEngine;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::config::{Config, PlacerKind};

/// ChaCha stream used by the revealer. The engine draws from stream 0 of
/// the same seed, so the two never share random numbers.
const REVEALER_STREAM: u64 = 1;

/// Costs closer than this count as the same; the table stores `f32`.
const COST_TOLERANCE: f64 = 1e-5;

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    /// 1-based game number
    pub game: u32,
    /// Placer turns taken, skips included
    pub rounds: u32,
    /// Placer turns that skipped
    pub skips: u32,
    /// Whether the board was completely covered
    pub completed: bool,
    /// Covered fraction of the board at the end
    pub fill_ratio: f64,
    /// Time spent searching
    pub search_time: Duration,
    /// Optimal expected reveals from the starting board, when the exact
    /// table was built
    pub expected_rolls: Option<f64>,
    /// Placements scored against the exact table
    pub compared: u32,
    /// Scored placements that were as good as the table's choice
    pub agreed: u32,
    /// Extra expected reveals summed over the scored placements
    pub regret: f64,
}

/// Totals over every game of a run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub games: u32,
    pub completed: u32,
    pub total_rounds: u64,
    pub total_skips: u64,
    pub search_time: Duration,
    pub compared: u64,
    pub agreed: u64,
    pub regret: f64,
}

impl RunSummary {
    /// Add one finished game.
    pub fn add(&mut self, game: &GameSummary) {
        self.games += 1;
        if game.completed {
            self.completed += 1;
        }
        self.total_rounds += u64::from(game.rounds);
        self.total_skips += u64::from(game.skips);
        self.search_time += game.search_time;
        self.compared += u64::from(game.compared);
        self.agreed += u64::from(game.agreed);
        self.regret += game.regret;
    }

    /// Mean rounds per completed or abandoned game.
    pub fn mean_rounds(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.games)
        }
    }

    /// Log a summary of the run.
    pub fn log_summary(&self) {
        if self.games == 0 {
            return;
        }

        info!(
            games = self.games,
            completed = self.completed,
            mean_rounds = format!("{:.1}", self.mean_rounds()),
            skips = self.total_skips,
            search_secs = format!("{:.2}", self.search_time.as_secs_f64()),
            "Run finished"
        );

        if self.compared > 0 {
            info!(
                compared = self.compared,
                agreement = format!("{:.3}", self.agreed as f64 / self.compared as f64),
                mean_regret = format!("{:.4}", self.regret / self.compared as f64),
                "Placements scored against the exact table"
            );
        }
    }
}

/// Plays games with one placer and one revealer RNG.
///
/// Both persist across games, so a seeded run replays exactly. The exact
/// table is built on the first game that needs it and kept for as long as
/// it covers the starting boards.
pub struct Session {
    engine: MctsEngine,
    exact: Option<ExactSolver>,
    placer: PlacerKind,
    compare: bool,
    needs_table: bool,
    revealer: ChaCha20Rng,
    max_rounds: u32,
    render: bool,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let engine = MctsEngine::new(config.mcts_config()).context("invalid engine settings")?;

        let mut revealer = match config.seed() {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        revealer.set_stream(REVEALER_STREAM);

        Ok(Self {
            engine,
            exact: None,
            placer: config.placer,
            compare: config.compare && config.placer == PlacerKind::Mcts,
            needs_table: config.needs_exact_table(),
            revealer,
            max_rounds: config.max_rounds,
            render: config.render(),
        })
    }

    /// Play one game from an empty board.
    pub fn play_game(&mut self, game: u32) -> Result<GameSummary> {
        self.play_from(game, State::new())
    }

    /// Play one game from `state`, which must be on the revealer's turn.
    pub fn play_from(&mut self, game: u32, mut state: State) -> Result<GameSummary> {
        let mut skips = 0;
        let mut search_time = Duration::ZERO;
        let mut compared = 0;
        let mut agreed = 0;
        let mut regret = 0.0;

        if self.needs_table {
            self.prepare_exact_table(state.occupancy())?;
        }
        let expected_rolls = self
            .exact
            .as_ref()
            .and_then(|exact| exact.expected_rolls(state.occupancy()));

        debug!(
            game,
            empty_cells = state.empty_cells(),
            expected_rolls = ?expected_rolls,
            "Starting game"
        );

        while !state.is_done() {
            if state.round() >= self.max_rounds {
                warn!(
                    game,
                    rounds = state.round(),
                    fill = state.fill_ratio(),
                    "Giving up on game, max_rounds reached"
                );
                break;
            }

            // Revealer: uniform over the legal pieces
            let legal = state.legal_actions();
            let piece = pick_uniform(&legal, &mut self.revealer)
                .ok_or_else(|| anyhow!("revealer has no legal action"))?;
            state.try_apply_action(piece)?;

            if self.render {
                print!("{state}");
            }

            // Placer decides
            let started = Instant::now();
            let action = self.decide(&state)?;
            search_time += started.elapsed();

            if self.compare {
                if let Some(extra) = self.regret_of(&state, action) {
                    compared += 1;
                    if extra <= COST_TOLERANCE {
                        agreed += 1;
                    } else {
                        debug!(game, piece, action, extra, "Placement worse than the table");
                    }
                    regret += extra;
                }
            }

            if action == SKIP_ACTION {
                skips += 1;
            }
            state
                .try_apply_action(action)
                .with_context(|| format!("engine chose action {action}"))?;

            debug!(
                game,
                round = state.round(),
                piece,
                action,
                fill = state.fill_ratio(),
                "Round complete"
            );
        }

        if self.render {
            print!("{state}");
        }

        Ok(GameSummary {
            game,
            rounds: state.round(),
            skips,
            completed: state.is_done(),
            fill_ratio: state.fill_ratio(),
            search_time,
            expected_rolls,
            compared,
            agreed,
            regret,
        })
    }

    /// Build the exact table unless the current one already covers `occupancy`.
    fn prepare_exact_table(&mut self, occupancy: u32) -> Result<()> {
        if self.exact.as_ref().is_some_and(|exact| exact.covers(occupancy)) {
            return Ok(());
        }

        info!(
            free_cells = CELL_COUNT - occupancy.count_ones(),
            "Building exact expected-rolls table"
        );
        let started = Instant::now();
        let exact = ExactSolver::new(occupancy).context("invalid starting board")?;
        info!(
            boards = exact.boards(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Exact table ready"
        );

        self.exact = Some(exact);
        Ok(())
    }

    fn decide(&mut self, state: &State) -> Result<ActionId> {
        let kind = self.placer;
        let placer: &mut dyn Solver<State> = match kind {
            PlacerKind::Mcts => &mut self.engine,
            PlacerKind::Exact => self
                .exact
                .as_mut()
                .ok_or_else(|| anyhow!("exact table has not been built"))?,
        };

        placer
            .solve(state)
            .ok_or_else(|| anyhow!("{kind:?} placer returned no action for a live position"))
    }

    /// Expected extra reveals `action` costs over the table's best answer.
    fn regret_of(&self, state: &State, action: ActionId) -> Option<f64> {
        let exact = self.exact.as_ref()?;
        let piece = state.active_piece()?;
        let occupancy = state.occupancy();

        let best = exact.choices(occupancy)?[usize::from(piece)];
        let cost = exact.action_cost(occupancy, piece, action)?;
        Some((cost - best.expected_rolls).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_jigsaw::{cell_bit, FULL_BOARD};

    fn test_config() -> Config {
        Config {
            games: 1,
            iterations: 200,
            max_depth: 15,
            exploration: 1.0,
            seed: 42,
            time_budget_ms: 0,
            max_rounds: 200,
            placer: PlacerKind::Mcts,
            compare: false,
            quiet: true,
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_single_hole_gets_filled() {
        let mut session = Session::new(&test_config()).unwrap();
        let state = State::with_occupancy(FULL_BOARD & !cell_bit(1, 3)).unwrap();

        let summary = session.play_from(1, state).unwrap();

        assert!(summary.completed);
        assert!((summary.fill_ratio - 1.0).abs() < f64::EPSILON);
        // Only the single cell fits, everything else is a forced skip
        assert_eq!(summary.skips, summary.rounds - 1);
    }

    #[test]
    fn test_game_ends_within_max_rounds() {
        let mut session = Session::new(&test_config()).unwrap();
        let summary = session.play_game(1).unwrap();

        assert!(summary.rounds <= 200);
        assert!(summary.completed || summary.rounds == 200);
        assert!(summary.skips <= summary.rounds);
    }

    #[test]
    fn test_max_rounds_cap() {
        let mut config = test_config();
        config.max_rounds = 1;
        let mut session = Session::new(&config).unwrap();

        let summary = session.play_game(1).unwrap();

        assert_eq!(summary.rounds, 1);
        assert!(!summary.completed);
        assert!(summary.fill_ratio > 0.0 || summary.skips == 1);
    }

    #[test]
    fn test_seeded_sessions_replay() {
        let config = test_config();
        let mut a = Session::new(&config).unwrap();
        let mut b = Session::new(&config).unwrap();

        for game in 1..=2 {
            let mut ra = a.play_game(game).unwrap();
            let mut rb = b.play_game(game).unwrap();
            ra.search_time = Duration::ZERO;
            rb.search_time = Duration::ZERO;
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn test_invalid_engine_settings_are_reported() {
        let mut config = test_config();
        config.iterations = 0;
        let err = Session::new(&config).err().unwrap();
        assert!(err.to_string().contains("engine settings"));
    }

    fn exact_config() -> Config {
        Config {
            placer: PlacerKind::Exact,
            ..test_config()
        }
    }

    fn square_hole() -> u32 {
        FULL_BOARD & !(cell_bit(2, 4) | cell_bit(2, 5) | cell_bit(3, 4) | cell_bit(3, 5))
    }

    #[test]
    fn test_exact_placer_fills_single_hole() {
        let mut session = Session::new(&exact_config()).unwrap();
        let state = State::with_occupancy(FULL_BOARD & !cell_bit(0, 5)).unwrap();

        let summary = session.play_from(1, state).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.skips, summary.rounds - 1);
        let expected = summary.expected_rolls.unwrap();
        assert!((expected - 6.0).abs() < 1e-4);
        assert_eq!(summary.compared, 0);
    }

    #[test]
    fn test_exact_placer_completes_square_hole() {
        let mut session = Session::new(&exact_config()).unwrap();
        let summary = session
            .play_from(1, State::with_occupancy(square_hole()).unwrap())
            .unwrap();

        assert!(summary.completed);
        assert!(summary.expected_rolls.unwrap() > 1.0);
    }

    #[test]
    fn test_exact_table_is_reused_while_it_covers_the_board() {
        let mut session = Session::new(&exact_config()).unwrap();
        let base = square_hole();

        session
            .play_from(1, State::with_occupancy(base).unwrap())
            .unwrap();
        assert_eq!(session.exact.as_ref().map(ExactSolver::base), Some(base));

        // A sub-hole of the square is already in the table
        let smaller = base | cell_bit(2, 4);
        session
            .play_from(2, State::with_occupancy(smaller).unwrap())
            .unwrap();
        assert_eq!(session.exact.as_ref().map(ExactSolver::base), Some(base));

        // A disjoint hole needs a new table
        let other = FULL_BOARD & !cell_bit(0, 0);
        session
            .play_from(3, State::with_occupancy(other).unwrap())
            .unwrap();
        assert_eq!(session.exact.as_ref().map(ExactSolver::base), Some(other));
    }

    #[test]
    fn test_mcts_placements_are_scored_against_the_table() {
        let config = Config {
            compare: true,
            ..test_config()
        };
        let mut session = Session::new(&config).unwrap();
        let state = State::with_occupancy(FULL_BOARD & !cell_bit(1, 3)).unwrap();

        let summary = session.play_from(1, state).unwrap();

        // One sensible move per round: place the single cell or skip
        assert_eq!(summary.compared, summary.rounds);
        assert_eq!(summary.agreed, summary.compared);
        assert!(summary.regret.abs() < 1e-9);
        assert!(summary.expected_rolls.is_some());
    }

    #[test]
    fn test_no_table_without_exact_or_compare() {
        let mut session = Session::new(&test_config()).unwrap();
        let summary = session
            .play_from(1, State::with_occupancy(square_hole()).unwrap())
            .unwrap();

        assert!(session.exact.is_none());
        assert_eq!(summary.expected_rolls, None);
        assert_eq!(summary.compared, 0);
    }

    #[test]
    fn test_run_summary() {
        let mut run = RunSummary::default();
        assert!(run.mean_rounds().abs() < f64::EPSILON);

        run.add(&GameSummary {
            game: 1,
            rounds: 10,
            skips: 2,
            completed: true,
            fill_ratio: 1.0,
            search_time: Duration::from_millis(5),
            expected_rolls: None,
            compared: 4,
            agreed: 3,
            regret: 0.5,
        });
        run.add(&GameSummary {
            game: 2,
            rounds: 20,
            skips: 4,
            completed: false,
            fill_ratio: 0.5,
            search_time: Duration::from_millis(7),
            expected_rolls: Some(20.0),
            compared: 0,
            agreed: 0,
            regret: 0.0,
        });

        assert_eq!(run.games, 2);
        assert_eq!(run.completed, 1);
        assert_eq!(run.total_skips, 6);
        assert!((run.mean_rounds() - 15.0).abs() < f64::EPSILON);
        assert_eq!(run.search_time, Duration::from_millis(12));
        assert_eq!(run.compared, 4);
        assert_eq!(run.agreed, 3);
        assert!((run.regret - 0.5).abs() < f64::EPSILON);
    }
}
