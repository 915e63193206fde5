//! N×N gomoku board with move history.

use crate::rules;
use crate::types::{Move, Player, Position, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::{debug, instrument};

/// Smallest board on which five in a row is possible.
pub const MIN_BOARD_SIZE: usize = 5;

/// Largest supported board; row and column indices stay two digits wide.
pub const MAX_BOARD_SIZE: usize = 99;

/// Square gomoku board.
///
/// Cells are stored row-major. Stones are only ever added through
/// [`Board::make_move`], which also records them in the history, so an
/// occupied cell never changes owner.
///
/// Serializes as its size and move history. Deserializing replays the
/// history through [`Board::make_move`], so a malformed record is
/// rejected instead of producing an inconsistent board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    pub(crate) size: usize,
    pub(crate) squares: Vec<Square>,
    pub(crate) history: Vec<Move>,
}

impl Board {
    /// Creates an empty board of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if `size` is outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size < MIN_BOARD_SIZE {
            return Err(BoardError::new(format!(
                "Board size {} is too small (minimum {})",
                size, MIN_BOARD_SIZE
            )));
        }
        if size > MAX_BOARD_SIZE {
            return Err(BoardError::new(format!(
                "Board size {} is too large (maximum {})",
                size, MAX_BOARD_SIZE
            )));
        }
        let cells = size
            .checked_mul(size)
            .ok_or_else(|| BoardError::new(format!("Board size {} overflows cell count", size)))?;
        debug!(size, "Creating empty board");
        Ok(Self {
            size,
            squares: vec![Square::Empty; cells],
            history: Vec::new(),
        })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Center cell, `(size / 2, size / 2)`.
    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// Returns true if the position lies on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Gets the square at the given position, or `None` if out of bounds.
    pub fn get(&self, pos: Position) -> Option<Square> {
        self.in_bounds(pos).then(|| self.squares[self.index(pos)])
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Returns the applied moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns up to `n` of the most recent moves, oldest first.
    pub fn last_moves(&self, n: usize) -> &[Move] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Number of stones the player has on the board.
    pub fn stone_count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|sq| **sq == Square::Occupied(player))
            .count()
    }

    /// Returns true if the position is on the board and empty.
    pub fn is_valid_move(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Places a stone for `player` and records it in the history.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] without touching the board if the position is
    /// off the board or already occupied.
    #[instrument(skip_all, fields(position = %pos, player = %player))]
    pub fn make_move(&mut self, pos: Position, player: Player) -> Result<(), MoveError> {
        match self.get(pos) {
            None => Err(MoveError::OutOfBounds {
                position: pos,
                size: self.size,
            }),
            Some(Square::Occupied(owner)) => Err(MoveError::Occupied {
                position: pos,
                owner,
            }),
            Some(Square::Empty) => {
                let idx = self.index(pos);
                self.squares[idx] = Square::Occupied(player);
                self.history.push(Move::new(pos, player));
                debug!(moves = self.history.len(), "Stone placed");
                Ok(())
            }
        }
    }

    /// Returns true if the stone at `pos` completes five or more in a row
    /// for `player`.
    ///
    /// Only the lines through `pos` are examined, so this must be called
    /// with the stone that was just placed.
    pub fn check_winner(&self, pos: Position, player: Player) -> bool {
        rules::check_winner(self, pos, player)
    }

    /// Returns true if no empty cell remains.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Returns every empty position in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, sq)| sq.is_empty())
            .map(|(idx, _)| Position::new(idx / self.size, idx % self.size))
            .collect()
    }

    /// Temporarily places a stone that is removed again when the guard drops.
    ///
    /// The stone is not recorded in the history. Returns `None` if the
    /// position is not a valid move.
    pub fn speculate(&mut self, pos: Position, player: Player) -> Option<SpeculativeStone<'_>> {
        if !self.is_valid_move(pos) {
            return None;
        }
        let idx = self.index(pos);
        self.squares[idx] = Square::Occupied(player);
        Some(SpeculativeStone {
            board: self,
            position: pos,
        })
    }

    /// Formats the board as a human-readable grid with row and column indices.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..self.size {
            result.push_str(&format!("{:2} ", col));
        }
        result.push('\n');
        result.push_str("   ");
        result.push_str(&"---".repeat(self.size));
        result.push('\n');

        for row in 0..self.size {
            result.push_str(&format!("{:2}|", row));
            for col in 0..self.size {
                let symbol = match self.squares[row * self.size + col] {
                    Square::Empty => ' ',
                    Square::Occupied(player) => player.symbol(),
                };
                result.push_str(&format!(" {} ", symbol));
            }
            result.push_str("|\n");
        }
        result.push_str("   ");
        result.push_str(&"---".repeat(self.size));
        result
    }
}

/// A stone placed by [`Board::speculate`].
///
/// Dereferences to the board so rules can be evaluated with the stone in
/// place. The cell is emptied again on drop.
#[derive(Debug)]
pub struct SpeculativeStone<'a> {
    board: &'a mut Board,
    position: Position,
}

impl SpeculativeStone<'_> {
    /// Where the speculative stone sits.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl Deref for SpeculativeStone<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for SpeculativeStone<'_> {
    fn drop(&mut self) {
        let idx = self.board.index(self.position);
        self.board.squares[idx] = Square::Empty;
    }
}

/// Wire form of a [`Board`]: enough to rebuild it by replay.
#[derive(Debug, Serialize, Deserialize)]
struct BoardRecord {
    size: usize,
    history: Vec<Move>,
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        Self {
            size: board.size,
            history: board.history,
        }
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = BoardError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let mut board = Board::new(record.size)?;
        for (idx, mov) in record.history.into_iter().enumerate() {
            board
                .make_move(mov.position, mov.player)
                .map_err(|e| BoardError::new(format!("Invalid move {} in history: {}", idx + 1, e)))?;
        }
        Ok(board)
    }
}

/// Board construction error.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", message, file, line)]
pub struct BoardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Reasons a stone cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The position lies outside the board.
    #[display("Position {position} is outside the {size}x{size} board")]
    OutOfBounds {
        /// Requested position.
        position: Position,
        /// Board side length.
        size: usize,
    },
    /// The cell already holds a stone.
    #[display("Position {position} is already occupied by {owner}")]
    Occupied {
        /// Requested position.
        position: Position,
        /// Owner of the existing stone.
        owner: Player,
    },
}
