//! Prompt construction for move proposals.

use strictly_gomoku::{Board, Player, Position, Square, WIN_LENGTH};
use tracing::instrument;

/// How many of the latest moves are shown to the model.
pub const RECENT_MOVES: usize = 5;

/// How many empty cells are listed as examples.
pub const EXAMPLE_POSITIONS: usize = 10;

/// Marker for empty cells in the prompt grid.
pub const EMPTY_MARKER: char = '.';

/// Renders the board as an indexed grid of symbols.
pub fn render_grid(board: &Board) -> String {
    let size = board.size();
    let mut grid = String::from("   ");
    for col in 0..size {
        grid.push_str(&format!("{:2} ", col));
    }
    grid.push('\n');

    for row in 0..size {
        grid.push_str(&format!("{:2} ", row));
        for col in 0..size {
            let symbol = match board.get(Position::new(row, col)) {
                Some(Square::Occupied(player)) => player.symbol(),
                _ => EMPTY_MARKER,
            };
            grid.push_str(&format!(" {} ", symbol));
        }
        grid.push('\n');
    }
    grid
}

fn render_recent_moves(board: &Board) -> String {
    let recent = board.last_moves(RECENT_MOVES);
    if recent.is_empty() {
        return String::new();
    }
    let first_number = board.history().len() - recent.len() + 1;
    let mut text = String::from("\nRecent moves:\n");
    for (offset, mov) in recent.iter().enumerate() {
        text.push_str(&format!(
            "Move {}: Player {} at {}\n",
            first_number + offset,
            mov.player,
            mov.position
        ));
    }
    text
}

fn render_examples(empty_positions: &[Position]) -> String {
    if empty_positions.is_empty() {
        return String::new();
    }
    let examples: Vec<String> = empty_positions
        .iter()
        .take(EXAMPLE_POSITIONS)
        .map(|pos| pos.to_string())
        .collect();
    format!("\nSome available positions: {}\n", examples.join(", "))
}

/// Builds the full prompt asking the model for `player`'s next move.
#[instrument(skip_all, fields(player = %player, moves = board.history().len()))]
pub fn build_prompt(board: &Board, player: Player, empty_positions: &[Position]) -> String {
    let opponent = player.opponent();
    let size = board.size();

    format!(
        "You are an expert Gomoku player. You play as '{player}' and your opponent plays as '{opponent}'.\n\
\n\
Current board state:\n\
{grid}{recent}{examples}\n\
GAME RULES:\n\
- Board size: {size}x{size}\n\
- Win condition: Get {WIN_LENGTH} of your stones in a row (horizontal, vertical, or diagonal)\n\
- '{player}' = your stones, '{opponent}' = opponent's stones, '{EMPTY_MARKER}' = empty cells\n\
\n\
CRITICAL: You can ONLY place your stone on EMPTY cells (marked with '{EMPTY_MARKER}').\n\
DO NOT choose positions that already have '{player}' or '{opponent}'.\n\
\n\
STRATEGY:\n\
1. Try to create or extend your own lines of stones\n\
2. Block opponent's lines if they're getting close to {WIN_LENGTH}\n\
3. Choose empty positions near existing stones for better chances\n\
\n\
IMPORTANT: Respond with ONLY row,col of an EMPTY position.\n\
Format: row,col (e.g., \"5,3\" or \"0,0\")\n\
\n\
NOTE: If you have a thinking process, try to make it as concise as possible.\n\
\n\
Choose an empty position:",
        grid = render_grid(board),
        recent = render_recent_moves(board),
        examples = render_examples(empty_positions),
    )
}
