//! Immediate-win search.

use crate::board::Board;
use crate::types::{Player, Position};
use tracing::{debug, instrument};

/// Finds the first candidate where a `player` stone wins on the spot.
///
/// Each candidate is tried with a speculative stone that is removed
/// before the next one is tried, so the board and its history are left
/// exactly as they were. Candidates are tried in the given order, which
/// callers pass row-major. Occupied or off-board candidates are skipped.
///
/// Called with the mover's own player this finds a winning move; called
/// with the opponent it finds the cell that must be blocked.
#[instrument(skip_all, fields(player = %player, candidates = candidates.len()))]
pub fn find_winning_move(
    board: &mut Board,
    player: Player,
    candidates: &[Position],
) -> Option<Position> {
    let found = candidates.iter().copied().find(|&pos| {
        board
            .speculate(pos, player)
            .is_some_and(|stone| stone.check_winner(stone.position(), player))
    });

    if let Some(pos) = found {
        debug!(position = %pos, "Found winning cell");
    }
    found
}
