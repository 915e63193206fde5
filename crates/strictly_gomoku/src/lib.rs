//! Pure gomoku game logic.
//!
//! Five in a row on an N×N board, with the move-selection building blocks
//! an automated player needs:
//!
//! - [`Board`]: grid storage, move history, win and draw detection.
//! - [`find_winning_move`]: immediate-win search, used both to win and to block.
//! - [`strategic_fallback`]: deterministic geometric move choice.
//! - [`invariants`]: properties that hold throughout a match.
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod fallback;
pub mod invariants;
pub mod rules;
mod tactics;
mod types;

pub use board::{Board, BoardError, MoveError, SpeculativeStone, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use fallback::{has_occupied_neighbour, strategic_fallback};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, MatchInvariants};
pub use rules::{Direction, WIN_LENGTH};
pub use tactics::find_winning_move;
pub use types::{Move, Player, Position, Square};
