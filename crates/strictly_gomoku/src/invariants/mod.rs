//! Board properties checked after every move of a match.
//!
//! Each property is a zero-sized type implementing [`Invariant`] for
//! [`Board`](crate::Board). Tuples of them form an [`InvariantSet`] so a
//! caller can check several at once and collect every failure.

use derive_more::Display;

/// A property of `S` that a well-formed value always satisfies.
pub trait Invariant<S> {
    /// Whether `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Short statement of the property, used in violation reports.
    fn description() -> &'static str;

    /// Returns a violation naming this property if `state` fails it.
    fn check(state: &S) -> Option<InvariantViolation> {
        (!Self::holds(state)).then(|| InvariantViolation::new(Self::description()))
    }
}

/// A failed property check.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Invariant violated: {description}")]
pub struct InvariantViolation {
    /// Statement of the property that failed.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a violation for the property described by `description`.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Several invariants checked in one pass.
pub trait InvariantSet<S> {
    /// Checks every member and returns all failures, in member order.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member: Invariant<S>),+> InvariantSet<S> for ($($member,)+) {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let violations: Vec<_> = [$($member::check(state)),+]
                    .into_iter()
                    .flatten()
                    .collect();
                if violations.is_empty() { Ok(()) } else { Err(violations) }
            }
        }
    };
}

impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);
impl_invariant_set!(A, B, C, D);

pub mod alternating_turn;
pub mod history_consistent;
pub mod monotonic_board;

pub use alternating_turn::AlternatingTurnInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_board::MonotonicBoardInvariant;

/// All board invariants that hold during a match.
pub type MatchInvariants = (
    MonotonicBoardInvariant,
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Player, Position, Square};

    #[test]
    fn test_invariant_set_holds_for_empty_board() {
        let board = Board::new(6).unwrap();
        assert!(MatchInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut board = Board::new(6).unwrap();
        board.make_move(Position::new(3, 3), Player::X).unwrap();
        board.make_move(Position::new(2, 2), Player::O).unwrap();
        board.make_move(Position::new(3, 4), Player::X).unwrap();
        assert!(MatchInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut board = Board::new(6).unwrap();
        board.make_move(Position::new(3, 3), Player::X).unwrap();

        // Stone with no history entry
        let idx = board.index(Position::new(0, 0));
        board.squares[idx] = Square::Occupied(Player::O);

        let violations = MatchInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].description,
            MonotonicBoardInvariant::description()
        );
    }

    #[test]
    fn test_violation_display_names_the_property() {
        let mut board = Board::new(6).unwrap();
        let idx = board.index(Position::new(1, 1));
        board.squares[idx] = Square::Occupied(Player::X);

        let violation = HistoryConsistentInvariant::check(&board).unwrap();
        assert_eq!(
            violation.to_string(),
            "Invariant violated: History length matches number of occupied cells"
        );
        assert!(MonotonicBoardInvariant::check(&Board::new(6).unwrap()).is_none());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let board = Board::new(5).unwrap();
        type TwoInvariants = (MonotonicBoardInvariant, HistoryConsistentInvariant);
        assert!(TwoInvariants::check_all(&board).is_ok());
    }
}
