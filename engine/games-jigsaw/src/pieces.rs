//! Fixed catalog of piece shapes.
//!
//! Every piece is a 24-bit mask over the same 4x6 layout as the board,
//! anchored at the top-left cell (bit 23). Placing a piece at offset `a`
//! means shifting its mask right by `a`, which moves the anchor to cell
//! index `a` (row `a / 6`, column `a % 6`).

use engine_core::ActionId;

use crate::{CELL_COUNT, COLS, ROWS};

/// Index into [`PIECES`].
pub type PieceId = u8;

/// Number of shapes the revealer can choose from.
pub const PIECE_COUNT: usize = 6;

/// A piece shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Occupied cells, top-left anchored
    pub mask: u32,
    /// Short human-readable name
    pub name: &'static str,
}

/// The shapes, indexed by [`PieceId`].
pub const PIECES: [Piece; PIECE_COUNT] = [
    Piece {
        mask: 0b100000_000000_000000_000000,
        name: "single",
    },
    Piece {
        mask: 0b100000_100000_100000_000000,
        name: "bar",
    },
    Piece {
        mask: 0b100000_110000_000000_000000,
        name: "l-tromino",
    },
    Piece {
        mask: 0b110000_010000_000000_000000,
        name: "j-tromino",
    },
    Piece {
        mask: 0b110000_110000_000000_000000,
        name: "square",
    },
    Piece {
        mask: 0b110000_011000_000000_000000,
        name: "zigzag",
    },
];

/// Look up a piece by id.
#[inline]
pub fn piece(id: PieceId) -> Option<&'static Piece> {
    PIECES.get(usize::from(id))
}

impl Piece {
    /// Number of cells the piece covers.
    #[inline]
    pub const fn cell_count(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Whether the piece stays on the board when anchored at `offset`.
    ///
    /// Checks geometry only, not overlap with the board. Two conditions:
    /// no bit is shifted below bit 0, and no row is shifted across the right
    /// edge into the row below (the low `offset % COLS` bits of every piece
    /// row must be clear).
    pub fn fits_at(&self, offset: ActionId) -> bool {
        let offset = u32::from(offset);
        if offset >= CELL_COUNT {
            return false;
        }

        if (self.mask >> offset) << offset != self.mask {
            return false;
        }

        let x_offset = offset % COLS;
        let wrap_bits = (1u32 << x_offset) - 1;
        (0..ROWS).all(|row| (self.mask >> (COLS * row)) & wrap_bits == 0)
    }

    /// Board bits covered when anchored at `offset`, if it fits.
    #[inline]
    pub fn placed_at(&self, offset: ActionId) -> Option<u32> {
        self.fits_at(offset).then(|| self.mask >> offset)
    }

    /// Whether the cell at `(row, col)` relative to the anchor is covered.
    pub fn covers(&self, row: u32, col: u32) -> bool {
        row < ROWS && col < COLS && self.mask & crate::cell_bit(row, col) != 0
    }
}
