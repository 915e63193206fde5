//! Draw detection logic for gomoku.

use crate::board::Board;
use crate::types::Square;

/// Checks if the board is full (no empty cell left).
///
/// A full board whose last stone did not win is a draw.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}
