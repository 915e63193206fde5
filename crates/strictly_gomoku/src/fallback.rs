//! Deterministic geometric move choice.
//!
//! Used when no tactical move exists and no usable proposal came back.
//! The policy is, in order:
//!
//! 1. On an empty board, the center cell `(size / 2, size / 2)`.
//! 2. Otherwise, among empty cells touching a stone (any of the eight
//!    neighbours), the one closest to the center by Manhattan distance.
//! 3. Otherwise, the empty cell closest to the center.
//!
//! Ties go to the earliest candidate in the order given, which is
//! row-major when the candidates come from [`Board::empty_positions`].

use crate::board::Board;
use crate::types::Position;
use tracing::{debug, instrument};

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Returns true if any of the eight cells around `pos` holds a stone.
pub fn has_occupied_neighbour(board: &Board, pos: Position) -> bool {
    NEIGHBOURS.iter().any(|&(d_row, d_col)| {
        pos.offset(d_row, d_col, board.size())
            .and_then(|n| board.get(n))
            .is_some_and(|sq| !sq.is_empty())
    })
}

fn closest_to_center(center: Position, candidates: impl Iterator<Item = Position>) -> Option<Position> {
    // min_by_key keeps the first of equal minima
    candidates.min_by_key(|pos| pos.manhattan_distance(center))
}

/// Picks a move without consulting anything outside the board.
///
/// Returns `None` only when `empty_positions` is empty.
#[instrument(skip(board, empty_positions), fields(size = board.size(), empty = empty_positions.len()))]
pub fn strategic_fallback(board: &Board, empty_positions: &[Position]) -> Option<Position> {
    let center = board.center();

    if empty_positions.len() == board.size() * board.size() {
        debug!(position = %center, "Empty board, taking center");
        return Some(center);
    }

    let adjacent = closest_to_center(
        center,
        empty_positions
            .iter()
            .copied()
            .filter(|&pos| has_occupied_neighbour(board, pos)),
    );
    if let Some(pos) = adjacent {
        debug!(position = %pos, "Taking cell next to existing stones");
        return Some(pos);
    }

    let nearest = closest_to_center(center, empty_positions.iter().copied());
    debug!(position = ?nearest, "No stone neighbours, taking cell nearest center");
    nearest
}
