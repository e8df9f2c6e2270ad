//! Exact expected-rolls table for the placer.
//!
//! Against a uniformly random revealer, the number of reveals needed to
//! cover the board is something the placer can minimise exactly. For a board
//! `b` let `E(b)` be the optimal expected number of reveals still needed,
//! with `E(full) = 0`. Once piece `p` is revealed, placing it at `a` costs
//! `1 + E(b | p@a)` and skipping costs `1 + E(b)`. If the placer places
//! exactly the pieces in a set `S`, with costs `d_p`, then
//!
//! ```text
//! E(b) = (sum of d_p over S + PIECE_COUNT - |S|) / |S|
//! ```
//!
//! For a fixed size the cheapest `S` is the cheapest pieces, so only
//! `PIECE_COUNT` prefixes of the sorted costs need to be tried.
//!
//! Placing only ever adds cells, so visiting boards from most to least
//! covered sees every successor before it is needed. A table built from a
//! base occupancy covers every board reachable from it: `2^k` entries for
//! `k` empty cells, which is the whole `2^24` board space from an empty
//! board (64 MiB, a few seconds in release builds).

use engine_core::{ActionId, Solver};

use crate::pieces::{PieceId, PIECES, PIECE_COUNT};
use crate::{GameError, State, CELL_COUNT, FULL_BOARD, SKIP_ACTION};

/// What the placer should do with one piece, and what it costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceChoice {
    /// Placement offset, or [`SKIP_ACTION`]
    pub action: ActionId,
    /// Expected reveals to finish, counting the one that showed this piece
    pub expected_rolls: f64,
}

/// Optimal placer for every board reachable from a base occupancy.
#[derive(Debug, Clone)]
pub struct ExactSolver {
    base: u32,
    /// Single-bit masks of the cells empty in `base`, lowest bit first
    free_cells: Vec<u32>,
    /// `E(b)` indexed by the free-cell bits of `b`
    expected: Vec<f32>,
    /// Geometrically valid `(offset, mask)` pairs per piece that avoid `base`
    placements: [Vec<(ActionId, u32)>; PIECE_COUNT],
}

impl ExactSolver {
    /// Build the table for `base` and every board that contains it.
    pub fn new(base: u32) -> Result<Self, GameError> {
        if base & !FULL_BOARD != 0 {
            return Err(GameError::OutsideGrid { bits: base });
        }

        let free_cells: Vec<u32> = (0..CELL_COUNT)
            .map(|i| 1u32 << i)
            .filter(|&bit| base & bit == 0)
            .collect();

        let placements = std::array::from_fn(|p| {
            (0..CELL_COUNT as ActionId)
                .filter_map(|a| PIECES[p].placed_at(a).map(|mask| (a, mask)))
                .filter(|&(_, mask)| mask & base == 0)
                .collect()
        });

        let mut solver = Self {
            base,
            expected: vec![0.0; 1usize << free_cells.len()],
            free_cells,
            placements,
        };

        // Successors always have a larger index
        for index in (0..solver.expected.len()).rev() {
            let occupancy = solver.occupancy_at(index);
            if occupancy != FULL_BOARD {
                solver.expected[index] = solver.optimal_rolls(occupancy) as f32;
            }
        }

        Ok(solver)
    }

    /// Occupancy the table was built from.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of boards in the table.
    pub fn boards(&self) -> usize {
        self.expected.len()
    }

    /// Whether `occupancy` is reachable from the base, and so in the table.
    pub fn covers(&self, occupancy: u32) -> bool {
        occupancy & !FULL_BOARD == 0 && occupancy & self.base == self.base
    }

    /// Optimal expected reveals to finish from `occupancy`, before the next
    /// piece is revealed.
    pub fn expected_rolls(&self, occupancy: u32) -> Option<f64> {
        self.covers(occupancy).then(|| self.lookup(occupancy))
    }

    /// Best choice for every piece on `occupancy`, indexed by piece id.
    ///
    /// Ties between placements go to the smallest offset; a placement that
    /// costs exactly as much as skipping is preferred over the skip.
    pub fn choices(&self, occupancy: u32) -> Option<[PieceChoice; PIECE_COUNT]> {
        if !self.covers(occupancy) {
            return None;
        }

        let skip = PieceChoice {
            action: SKIP_ACTION,
            expected_rolls: 1.0 + self.lookup(occupancy),
        };

        Some(std::array::from_fn(|p| {
            match self.best_placement(occupancy, p) {
                Some(place) if place.expected_rolls <= skip.expected_rolls => place,
                _ => skip,
            }
        }))
    }

    /// Expected reveals to finish after answering `piece` with `action`.
    ///
    /// `None` for boards outside the table, unknown pieces and placements
    /// that do not fit.
    pub fn action_cost(&self, occupancy: u32, piece: PieceId, action: ActionId) -> Option<f64> {
        if !self.covers(occupancy) {
            return None;
        }

        if action == SKIP_ACTION {
            return (usize::from(piece) < PIECE_COUNT).then(|| 1.0 + self.lookup(occupancy));
        }

        let placed = crate::pieces::piece(piece)?.placed_at(action)?;
        (occupancy & placed == 0).then(|| 1.0 + self.lookup(occupancy | placed))
    }

    fn best_placement(&self, occupancy: u32, piece: usize) -> Option<PieceChoice> {
        let mut best: Option<PieceChoice> = None;

        for &(action, mask) in &self.placements[piece] {
            if occupancy & mask != 0 {
                continue;
            }
            let expected_rolls = 1.0 + self.lookup(occupancy | mask);
            if best.map_or(true, |b| expected_rolls < b.expected_rolls) {
                best = Some(PieceChoice {
                    action,
                    expected_rolls,
                });
            }
        }

        best
    }

    /// `E(b)` from the already computed successors of `occupancy`.
    fn optimal_rolls(&self, occupancy: u32) -> f64 {
        let mut costs: Vec<f64> = (0..PIECE_COUNT)
            .filter_map(|p| self.best_placement(occupancy, p))
            .map(|choice| choice.expected_rolls)
            .collect();
        costs.sort_by(f64::total_cmp);

        let mut sum = 0.0;
        let mut best = f64::INFINITY;
        for (i, cost) in costs.iter().enumerate() {
            sum += cost;
            let placed = (i + 1) as f64;
            best = best.min((sum + PIECE_COUNT as f64 - placed) / placed);
        }
        best
    }

    #[inline]
    fn lookup(&self, occupancy: u32) -> f64 {
        f64::from(self.expected[self.index_of(occupancy)])
    }

    fn index_of(&self, occupancy: u32) -> usize {
        if self.base == 0 {
            return occupancy as usize;
        }
        self.free_cells
            .iter()
            .enumerate()
            .filter(|&(_, &bit)| occupancy & bit != 0)
            .fold(0, |index, (i, _)| index | 1 << i)
    }

    fn occupancy_at(&self, index: usize) -> u32 {
        self.free_cells
            .iter()
            .enumerate()
            .filter(|&(i, _)| index & 1 << i != 0)
            .fold(self.base, |occupancy, (_, &bit)| occupancy | bit)
    }
}

impl Solver<State> for ExactSolver {
    /// Table answer for the revealed piece. `None` on the revealer's turn,
    /// on a covered board and for boards outside the table.
    fn solve(&mut self, state: &State) -> Option<ActionId> {
        if state.is_done() {
            return None;
        }
        let piece = state.active_piece()?;
        let choices = self.choices(state.occupancy())?;
        Some(choices[usize::from(piece)].action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_bit;

    fn hole(cells: &[(u32, u32)]) -> u32 {
        cells
            .iter()
            .fold(FULL_BOARD, |board, &(r, c)| board & !cell_bit(r, c))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_single_hole_waits_for_the_single_cell() {
        let base = hole(&[(1, 3)]);
        let solver = ExactSolver::new(base).unwrap();

        assert_eq!(solver.boards(), 2);
        assert_eq!(solver.expected_rolls(FULL_BOARD), Some(0.0));
        // One useful piece out of six
        assert_close(solver.expected_rolls(base).unwrap(), 6.0);

        let choices = solver.choices(base).unwrap();
        assert_eq!(
            choices[0],
            PieceChoice {
                action: 9,
                expected_rolls: 1.0
            }
        );
        for choice in &choices[1..] {
            assert_eq!(choice.action, SKIP_ACTION);
            assert_close(choice.expected_rolls, 7.0);
        }
    }

    #[test]
    fn test_two_cell_hole() {
        let base = hole(&[(2, 0), (3, 0)]);
        let solver = ExactSolver::new(base).unwrap();

        assert_eq!(solver.boards(), 4);
        // Six rolls for each single cell
        assert_close(solver.expected_rolls(base).unwrap(), 12.0);

        let choices = solver.choices(base).unwrap();
        // Both cells cost the same, the smaller offset wins
        assert_eq!(choices[0].action, 12);
        assert_close(choices[0].expected_rolls, 7.0);
        assert_eq!(choices[1].action, SKIP_ACTION);
        assert_close(choices[1].expected_rolls, 13.0);
    }

    #[test]
    fn test_square_hole() {
        let base = hole(&[(2, 4), (2, 5), (3, 4), (3, 5)]);
        let mut solver = ExactSolver::new(base).unwrap();
        assert_eq!(solver.boards(), 16);

        let expected = solver.expected_rolls(base).unwrap();
        assert!(expected.is_finite());
        assert!(expected > 1.0);

        let choices = solver.choices(base).unwrap();
        assert_eq!(
            choices[4],
            PieceChoice {
                action: 16,
                expected_rolls: 1.0
            }
        );
        // Neither the bar nor the zigzag fits a 2x2 hole
        assert_eq!(choices[1].action, SKIP_ACTION);
        assert_eq!(choices[5].action, SKIP_ACTION);

        for (piece, choice) in choices.iter().enumerate() {
            let state = State::with_piece(base, piece as PieceId).unwrap();
            assert!(state.is_legal(choice.action));
            assert!(choice.expected_rolls <= 1.0 + expected + 1e-9);
        }

        let square = State::with_piece(base, 4).unwrap();
        assert_eq!(solver.solve(&square), Some(16));
    }

    #[test]
    fn test_choices_average_to_expected_rolls() {
        // Bottom two rows empty: 4096 boards, every piece but the bar fits
        let base = 0b111111_111111_000000_000000;
        let solver = ExactSolver::new(base).unwrap();
        assert_eq!(solver.boards(), 1 << 12);

        for index in 0..solver.boards() {
            let occupancy = solver.occupancy_at(index);
            assert_eq!(solver.index_of(occupancy), index);
            if occupancy == FULL_BOARD {
                continue;
            }

            let choices = solver.choices(occupancy).unwrap();
            let mean =
                choices.iter().map(|c| c.expected_rolls).sum::<f64>() / PIECE_COUNT as f64;
            assert_close(mean, solver.expected_rolls(occupancy).unwrap());
        }
    }

    #[test]
    fn test_action_cost() {
        let base = hole(&[(2, 4), (2, 5), (3, 4), (3, 5)]);
        let solver = ExactSolver::new(base).unwrap();
        let expected = solver.expected_rolls(base).unwrap();

        assert_eq!(solver.action_cost(base, 4, 16), Some(1.0));
        assert_close(solver.action_cost(base, 4, SKIP_ACTION).unwrap(), 1.0 + expected);
        // Overlaps the filled part of the board
        assert_eq!(solver.action_cost(base, 4, 0), None);
        assert_eq!(solver.action_cost(base, PIECE_COUNT as PieceId, SKIP_ACTION), None);
        assert_eq!(solver.action_cost(0, 0, 0), None);
    }

    #[test]
    fn test_solve_outside_placer_turn_or_table() {
        let base = hole(&[(0, 0)]);
        let mut solver = ExactSolver::new(base).unwrap();

        assert_eq!(solver.solve(&State::with_occupancy(base).unwrap()), None);
        assert_eq!(solver.solve(&State::with_occupancy(FULL_BOARD).unwrap()), None);
        assert_eq!(solver.solve(&State::with_piece(0, 0).unwrap()), None);
        assert!(!solver.covers(0));
        assert_eq!(solver.expected_rolls(0), None);

        assert_eq!(solver.solve(&State::with_piece(base, 0).unwrap()), Some(0));
    }

    #[test]
    fn test_rejects_bits_outside_grid() {
        assert_eq!(
            ExactSolver::new(1 << CELL_COUNT).unwrap_err(),
            GameError::OutsideGrid { bits: 1 << CELL_COUNT }
        );
    }
}
