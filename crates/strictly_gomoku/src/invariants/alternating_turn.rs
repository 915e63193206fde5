//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::Invariant;
use crate::{Board, Player};

/// Invariant: Players alternate turns.
///
/// Move history must show X, O, X, O, ... pattern.
/// First move is always X.
pub struct AlternatingTurnInvariant;

impl Invariant<Board> for AlternatingTurnInvariant {
    fn holds(board: &Board) -> bool {
        let history = board.history();

        match history.first() {
            None => true,
            Some(first) if first.player != Player::X => false,
            Some(_) => history.windows(2).all(|w| w[0].player != w[1].player),
        }
    }

    fn description() -> &'static str {
        "Players alternate turns starting with X"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_alternating_moves_hold() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(2, 2), Player::X).unwrap();
        board.make_move(Position::new(2, 3), Player::O).unwrap();
        board.make_move(Position::new(3, 3), Player::X).unwrap();
        assert!(AlternatingTurnInvariant::holds(&board));
    }

    #[test]
    fn test_o_first_violates() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(2, 2), Player::O).unwrap();
        assert!(!AlternatingTurnInvariant::holds(&board));
    }

    #[test]
    fn test_double_move_violates() {
        let mut board = Board::new(5).unwrap();
        board.make_move(Position::new(2, 2), Player::X).unwrap();
        board.make_move(Position::new(2, 3), Player::X).unwrap();
        assert!(!AlternatingTurnInvariant::holds(&board));
    }
}
