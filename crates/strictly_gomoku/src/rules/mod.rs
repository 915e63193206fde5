//! Game rules for gomoku.
//!
//! This module contains pure functions for evaluating board state
//! according to gomoku rules. Rules are separated from board storage
//! so they can be tested against hand-built positions.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{check_winner, run_length, Direction, WIN_LENGTH};
