//! Core domain types for gomoku.

use derive_new::new;
use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Symbol used when rendering this player's stones.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty cell.
    Empty,
    /// Cell holding a player's stone.
    Occupied(Player),
}

impl Square {
    /// Returns true if no stone is on this cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Square::Empty)
    }

    /// Returns the owner of the stone on this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// A (row, column) coordinate, 0-indexed.
///
/// A position is only meaningful relative to a board; validity is checked
/// by [`crate::Board::is_valid_move`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new)]
pub struct Position {
    /// Row index (top is 0).
    pub row: usize,
    /// Column index (left is 0).
    pub col: usize,
}

impl Position {
    /// Manhattan distance between two positions.
    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Offsets this position by a signed delta, returning `None` if either
    /// coordinate would leave `[0, size)`.
    pub fn offset(self, d_row: isize, d_col: isize, size: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < size && col < size).then_some(Position { row, col })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A stone placed by a player, as recorded in the move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// Where the stone was placed.
    pub position: Position,
    /// Who placed it.
    pub player: Player,
}
