//! Monotonic board invariant: cells never change once set.

use super::Invariant;
use crate::{Board, Square};

/// Invariant: Board cells are monotonic (never overwritten).
///
/// Once a cell transitions from Empty to Occupied, it never changes.
/// This is verified by replaying the move history onto a fresh board.
pub struct MonotonicBoardInvariant;

impl Invariant<Board> for MonotonicBoardInvariant {
    fn holds(board: &Board) -> bool {
        let mut replayed = vec![Square::Empty; board.size() * board.size()];

        for mov in board.history() {
            let Some(idx) = board.in_bounds(mov.position).then(|| board.index(mov.position)) else {
                return false;
            };
            if replayed[idx] != Square::Empty {
                return false;
            }
            replayed[idx] = Square::Occupied(mov.player);
        }

        replayed == board.squares()
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Player, Position};

    #[test]
    fn test_empty_board_holds() {
        let board = Board::new(5).unwrap();
        assert!(MonotonicBoardInvariant::holds(&board));
    }

    #[test]
    fn test_moves_hold() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(0, 0), Player::X).unwrap();
        board.make_move(Position::new(4, 4), Player::O).unwrap();
        assert!(MonotonicBoardInvariant::holds(&board));
    }

    #[test]
    fn test_overwritten_cell_violates() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(2, 2), Player::X).unwrap();

        let idx = board.index(Position::new(2, 2));
        board.squares[idx] = Square::Occupied(Player::O);

        assert!(!MonotonicBoardInvariant::holds(&board));
    }

    #[test]
    fn test_duplicate_history_violates() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(2, 2), Player::X).unwrap();
        board.history.push(Move::new(Position::new(2, 2), Player::X));

        assert!(!MonotonicBoardInvariant::holds(&board));
    }
}
