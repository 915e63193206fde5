//! Win detection logic for gomoku.

use crate::board::Board;
use crate::types::{Player, Position, Square};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{instrument, trace};

/// Number of stones in a row needed to win. Longer runs also win.
pub const WIN_LENGTH: usize = 5;

/// The four line axes through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Direction {
    /// Unit step `(d_row, d_col)` along this axis.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// Counts `player`'s contiguous stones through `pos` along `direction`.
///
/// The cell at `pos` counts as one regardless of its contents; the run
/// extends forward and backward until a non-matching cell or the edge.
pub fn run_length(board: &Board, pos: Position, player: Player, direction: Direction) -> usize {
    let (d_row, d_col) = direction.step();
    1 + count_ray(board, pos, player, d_row, d_col) + count_ray(board, pos, player, -d_row, -d_col)
}

fn count_ray(board: &Board, start: Position, player: Player, d_row: isize, d_col: isize) -> usize {
    let mut count = 0;
    let mut cursor = start;
    while let Some(next) = cursor.offset(d_row, d_col, board.size()) {
        if board.get(next) != Some(Square::Occupied(player)) {
            break;
        }
        count += 1;
        cursor = next;
    }
    count
}

/// Checks whether the stone just placed at `pos` wins for `player`.
///
/// Returns `true` if any axis through `pos` holds at least
/// [`WIN_LENGTH`] consecutive stones of `player`. Cells away from the
/// lines through `pos` are never looked at.
#[instrument(level = "trace", skip_all, fields(position = %pos, player = %player))]
pub fn check_winner(board: &Board, pos: Position, player: Player) -> bool {
    Direction::iter().any(|direction| {
        let run = run_length(board, pos, player, direction);
        trace!(?direction, run, "Measured run");
        run >= WIN_LENGTH
    })
}
