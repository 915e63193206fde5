//! Extraction of a move from free-text model replies.
//!
//! Replies are matched against a fixed, ordered list of coordinate
//! patterns. Within a pattern only the first match in the text counts.
//! A pair that is not one of the currently empty cells is rejected and
//! the next pattern is tried.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use strictly_gomoku::Position;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

/// Coordinate notations recognised in replies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum CoordinatePattern {
    /// `5,3` or `5, 3`.
    #[strum(to_string = "plain")]
    Plain,
    /// `row: 5, col: 3`, also `column` and `=`.
    #[strum(to_string = "labeled")]
    Labeled,
    /// `(5,3)`.
    #[strum(to_string = "parenthesized")]
    Parenthesized,
    /// `5 3`.
    #[strum(to_string = "spaced")]
    Spaced,
}

static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*,\s*(\d+)").expect("plain pattern is valid"));
static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)row\s*[:=]?\s*(\d+).*col(?:umn)?\s*[:=]?\s*(\d+)")
        .expect("labeled pattern is valid")
});
static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+)\s*,\s*(\d+)\)").expect("parenthesized pattern is valid")
});
static SPACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+(\d+)").expect("spaced pattern is valid"));

impl CoordinatePattern {
    fn regex(self) -> &'static Regex {
        match self {
            CoordinatePattern::Plain => &*PLAIN,
            CoordinatePattern::Labeled => &*LABELED,
            CoordinatePattern::Parenthesized => &*PARENTHESIZED,
            CoordinatePattern::Spaced => &*SPACED,
        }
    }

    /// Returns the first `(row, col)` this pattern finds in `text`.
    ///
    /// `None` if the pattern does not match or a number does not fit.
    pub fn extract(self, text: &str) -> Option<Position> {
        let caps = self.regex().captures(text)?;
        let number = |caps: &Captures<'_>, idx: usize| caps.get(idx)?.as_str().parse::<usize>().ok();
        Some(Position::new(number(&caps, 1)?, number(&caps, 2)?))
    }
}

/// Parses a reply into a position that is one of `empty_positions`.
///
/// Returns `None` for empty or unrecognisable replies, and for replies
/// whose coordinates all point at occupied or off-board cells.
#[instrument(skip_all, fields(response_len = response.len()))]
pub fn parse_move(response: &str, empty_positions: &[Position]) -> Option<Position> {
    let response = response.trim();
    if response.is_empty() {
        debug!("Empty response received");
        return None;
    }

    let preview: String = response.chars().take(200).collect();
    debug!(response = %preview, "Parsing response");

    for pattern in CoordinatePattern::iter() {
        let Some(pos) = pattern.extract(response) else {
            continue;
        };
        debug!(%pattern, position = %pos, "Pattern matched");
        if empty_positions.contains(&pos) {
            debug!(position = %pos, "Valid move found");
            return Some(pos);
        }
        debug!(position = %pos, "Move not in empty positions");
    }

    debug!("No valid move found in response");
    None
}
