//! Fishing jigsaw puzzle for the jigsaw search engine
//!
//! Two agents take turns on a 4x6 grid. The revealer picks one of six piece
//! shapes; the placer drops it somewhere it fits, or skips. Cells only ever
//! fill up, and the game ends once every cell is covered.
//!
//! The whole position is four small integers, so [`State`] is `Copy` and
//! legality is a handful of shifts and masks.
//!
//! [`ExactSolver`] tabulates the optimal placer against a uniformly random
//! revealer, which gives an exact yardstick for search-based placers.
//!
//! # Usage
//!
//! ```rust
//! use games_jigsaw::{State, Turn, SKIP_ACTION};
//!
//! let mut state = State::new();
//! assert_eq!(state.turn(), Turn::Revealer);
//!
//! state.apply_action(0); // reveal the single-cell piece
//! let legal = state.legal_actions();
//! assert_eq!(legal.len(), 25);
//! assert_eq!(legal.last(), Some(&SKIP_ACTION));
//!
//! state.apply_action(0); // place it in the top-left corner
//! assert!(state.is_filled(0, 0));
//! assert_eq!(state.round(), 1);
//! ```

mod pieces;
mod render;
mod solver;

use engine_core::{ActionId, Game};
use std::fmt;
use thiserror::Error;

pub use pieces::{piece, Piece, PieceId, PIECES, PIECE_COUNT};
pub use render::BoardView;
pub use solver::{ExactSolver, PieceChoice};

/// Board height.
pub const ROWS: u32 = 4;

/// Board width.
pub const COLS: u32 = 6;

/// Number of cells, and number of placement offsets.
pub const CELL_COUNT: u32 = ROWS * COLS;

/// The placer's "do not place" action. Always legal on the placer's turn.
pub const SKIP_ACTION: ActionId = CELL_COUNT as ActionId;

/// Placement offsets plus the skip action.
pub const ACTION_COUNT: ActionId = SKIP_ACTION + 1;

/// Occupancy of a completely covered board.
pub const FULL_BOARD: u32 = (1 << CELL_COUNT) - 1;

/// Bit for the cell at `(row, col)`; row 0 is the top row.
#[inline]
pub const fn cell_bit(row: u32, col: u32) -> u32 {
    1 << (CELL_COUNT - 1 - (row * COLS + col))
}

/// Errors raised when building or driving a state from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("action {action} is not legal on the {turn} turn")]
    IllegalAction { action: ActionId, turn: Turn },

    #[error("occupancy {bits:#x} has bits outside the 4x6 grid")]
    OutsideGrid { bits: u32 },

    #[error("unknown piece {piece}, expected 0..6")]
    UnknownPiece { piece: PieceId },

    #[error("cell ({row}, {col}) is outside the 4x6 grid")]
    CellOutOfRange { row: u32, col: u32 },
}

/// Whose move it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// Chooses the next piece
    Revealer,
    /// Places the revealed piece or skips
    Placer,
}

impl Turn {
    /// The other agent.
    #[inline]
    pub fn other(self) -> Turn {
        match self {
            Turn::Revealer => Turn::Placer,
            Turn::Placer => Turn::Revealer,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Revealer => write!(f, "revealer"),
            Turn::Placer => write!(f, "placer"),
        }
    }
}

/// Puzzle position.
///
/// Invariants: occupancy never has bits at or above [`CELL_COUNT`], and
/// `active_piece` is `Some` exactly when it is the placer's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// One bit per cell, 1 = filled, bit 23 = top-left
    occupancy: u32,
    /// Piece waiting to be placed
    active_piece: Option<PieceId>,
    turn: Turn,
    /// Placer moves taken (skips included)
    round: u32,
    /// Actions taken since this state's root ancestor
    depth: u32,
}

impl State {
    /// Empty board, revealer to move.
    pub fn new() -> Self {
        Self {
            occupancy: 0,
            active_piece: None,
            turn: Turn::Revealer,
            round: 0,
            depth: 0,
        }
    }

    /// Revealer to move on a pre-filled board.
    pub fn with_occupancy(occupancy: u32) -> Result<Self, GameError> {
        if occupancy & !FULL_BOARD != 0 {
            return Err(GameError::OutsideGrid { bits: occupancy });
        }

        Ok(Self {
            occupancy,
            ..Self::new()
        })
    }

    /// Placer to move on a pre-filled board with `piece` already revealed.
    pub fn with_piece(occupancy: u32, piece: PieceId) -> Result<Self, GameError> {
        if pieces::piece(piece).is_none() {
            return Err(GameError::UnknownPiece { piece });
        }

        let mut state = Self::with_occupancy(occupancy)?;
        state.apply_action(piece);
        state.depth = 0;
        Ok(state)
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn active_piece(&self) -> Option<PieceId> {
        self.active_piece
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether every cell is covered.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.occupancy == FULL_BOARD
    }

    /// Whether the cell at `(row, col)` is filled. Out-of-range cells read as empty.
    pub fn is_filled(&self, row: u32, col: u32) -> bool {
        row < ROWS && col < COLS && self.occupancy & cell_bit(row, col) != 0
    }

    /// Flip a single cell.
    ///
    /// Editing helper for setting up positions by hand; play itself only
    /// ever adds cells.
    pub fn toggle_cell(&mut self, row: u32, col: u32) -> Result<(), GameError> {
        if row >= ROWS || col >= COLS {
            return Err(GameError::CellOutOfRange { row, col });
        }
        self.occupancy ^= cell_bit(row, col);
        Ok(())
    }

    /// Number of empty cells.
    pub fn empty_cells(&self) -> u32 {
        CELL_COUNT - self.occupancy.count_ones()
    }

    /// Fraction of the board that is covered, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.occupancy.count_ones()) / f64::from(CELL_COUNT)
    }

    /// The revealed piece, if any.
    pub fn piece(&self) -> Option<&'static Piece> {
        self.active_piece.and_then(pieces::piece)
    }

    /// Cells the active piece would cover at `offset`, if it fits there
    /// without overlapping anything.
    pub fn placement_mask(&self, offset: ActionId) -> Option<u32> {
        let placed = self.piece()?.placed_at(offset)?;
        (self.occupancy & placed == 0).then_some(placed)
    }

    /// Whether `action` is legal for the agent to move.
    pub fn is_legal(&self, action: ActionId) -> bool {
        match self.turn {
            Turn::Revealer => usize::from(action) < PIECE_COUNT,
            Turn::Placer => action == SKIP_ACTION || self.placement_mask(action).is_some(),
        }
    }

    /// Legal actions in ascending order.
    ///
    /// Revealer: every piece id, whatever the board looks like. Placer: each
    /// fitting, non-overlapping offset followed by [`SKIP_ACTION`].
    pub fn legal_actions(&self) -> Vec<ActionId> {
        match self.turn {
            Turn::Revealer => (0..PIECE_COUNT as ActionId).collect(),
            Turn::Placer => (0..ACTION_COUNT).filter(|&a| self.is_legal(a)).collect(),
        }
    }

    /// Apply `action` in place.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not legal. Use
    /// [`try_apply_action`](Self::try_apply_action) for untrusted input.
    pub fn apply_action(&mut self, action: ActionId) {
        match self.turn {
            Turn::Revealer => {
                assert!(
                    usize::from(action) < PIECE_COUNT,
                    "unknown piece {action} in {self:?}"
                );
                self.active_piece = Some(action);
            }
            Turn::Placer => {
                if action != SKIP_ACTION {
                    let Some(placed) = self.placement_mask(action) else {
                        panic!("illegal placement {action} in {self:?}");
                    };
                    self.occupancy |= placed;
                }
                self.active_piece = None;
                self.round += 1;
            }
        }

        self.turn = self.turn.other();
        self.depth += 1;
    }

    /// Checked variant of [`apply_action`](Self::apply_action) for external input.
    ///
    /// Leaves the state untouched when the action is illegal.
    pub fn try_apply_action(&mut self, action: ActionId) -> Result<(), GameError> {
        if !self.is_legal(action) {
            return Err(GameError::IllegalAction {
                action,
                turn: self.turn,
            });
        }
        self.apply_action(action);
        Ok(())
    }

    /// Read-only snapshot for renderers.
    pub fn view(&self) -> BoardView {
        BoardView {
            occupancy: self.occupancy,
            active_piece: self.active_piece,
            round: self.round,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for State {
    fn is_terminal(&self) -> bool {
        self.is_done()
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        State::legal_actions(self)
    }

    fn apply_action(&mut self, action: ActionId) {
        State::apply_action(self, action)
    }

    fn depth(&self) -> u32 {
        self.depth
    }
}
