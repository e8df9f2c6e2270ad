//! Text rendering of a puzzle position.
//!
//! Each board row is drawn as one line, followed by the matching row of the
//! revealed piece:
//!
//! ```text
//! ======== round 3 ========
//! ##++..  @.....
//! #+++..  @@....
//! ......  ......
//! ......  ......
//! ```
//!
//! `#` is a filled cell, `+` a cell where the revealed piece can be anchored,
//! `.` anything else. `@` marks the piece itself.

use std::fmt;

use crate::pieces::{self, PieceId};
use crate::{cell_bit, State, COLS, ROWS};

const FILLED: char = '#';
const LEGAL_ANCHOR: char = '+';
const EMPTY: char = '.';
const PIECE: char = '@';

/// Read-only snapshot of everything a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView {
    pub occupancy: u32,
    pub active_piece: Option<PieceId>,
    pub round: u32,
}

impl BoardView {
    /// Whether the cell at `(row, col)` is filled.
    pub fn is_filled(&self, row: u32, col: u32) -> bool {
        row < ROWS && col < COLS && self.occupancy & cell_bit(row, col) != 0
    }

    /// Whether the revealed piece covers `(row, col)` of its own preview.
    pub fn piece_covers(&self, row: u32, col: u32) -> bool {
        self.active_piece
            .and_then(pieces::piece)
            .is_some_and(|piece| piece.covers(row, col))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view();
        writeln!(f, "======== round {} ========", view.round)?;

        for row in 0..ROWS {
            let mut line = String::with_capacity(2 * COLS as usize + 2);

            for col in 0..COLS {
                let anchor = (row * COLS + col) as u8;
                let cell = if view.is_filled(row, col) {
                    FILLED
                } else if self.placement_mask(anchor).is_some() {
                    LEGAL_ANCHOR
                } else {
                    EMPTY
                };
                line.push(cell);
            }

            if view.active_piece.is_some() {
                line.push_str("  ");
                for col in 0..COLS {
                    line.push(if view.piece_covers(row, col) { PIECE } else { EMPTY });
                }
            }

            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}
