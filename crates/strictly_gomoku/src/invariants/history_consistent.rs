//! History consistency invariant: history length matches occupied cells.

use super::Invariant;
use crate::{Board, Square};

/// Invariant: History length equals number of occupied cells.
///
/// Every move in history corresponds to exactly one occupied cell.
/// A stone left behind by a speculative placement breaks this.
pub struct HistoryConsistentInvariant;

impl Invariant<Board> for HistoryConsistentInvariant {
    fn holds(board: &Board) -> bool {
        let occupied = board
            .squares()
            .iter()
            .filter(|s| **s != Square::Empty)
            .count();

        board.history().len() == occupied
    }

    fn description() -> &'static str {
        "History length matches number of occupied cells"
    }
}
