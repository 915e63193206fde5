//! Tests for the match loop, using agents that never contact a model server.

use strictly_duel::{
    DecisionSource, Duel, DuelConfig, DuelEvent, DuelOutcome, GomokuAgent, MoveProposer,
    ProposalError,
};
use strictly_gomoku::{Board, InvariantSet, MatchInvariants, Player, Position};
use tokio::sync::mpsc;

fn offline_duel(size: usize, max_moves: usize) -> Duel {
    Duel::new(
        Board::new(size).unwrap(),
        GomokuAgent::offline("AI Player 1", Player::X),
        GomokuAgent::offline("AI Player 2", Player::O),
        max_moves,
    )
    .unwrap()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<DuelEvent>) -> Vec<DuelEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_offline_duel_terminates_with_result() {
    let mut duel = offline_duel(6, 100);
    let outcome = duel.run().await;

    let moves = duel.board().history().len();
    assert!(moves <= 36);
    match &outcome {
        DuelOutcome::Won { player, moves: n, .. } => {
            assert_eq!(*n, moves);
            let last = duel.board().history().last().unwrap();
            assert_eq!(last.player, *player);
            assert!(duel.board().check_winner(last.position, *player));
        }
        DuelOutcome::Draw { moves: n } => {
            assert_eq!(*n, 36);
            assert!(duel.board().is_full());
        }
        other => panic!("unexpected outcome: {other}"),
    }
    assert!(MatchInvariants::check_all(duel.board()).is_ok());
}

#[tokio::test]
async fn test_offline_duel_is_deterministic() {
    let mut first = offline_duel(7, 100);
    let mut second = offline_duel(7, 100);
    assert_eq!(first.run().await, second.run().await);
    assert_eq!(first.board().history(), second.board().history());
}

#[tokio::test]
async fn test_move_cap_stops_match() {
    let mut duel = offline_duel(9, 3);
    let outcome = duel.run().await;

    assert_eq!(outcome, DuelOutcome::MoveLimit { moves: 3 });
    let history = duel.board().history();
    assert_eq!(history[0].position, Position::new(4, 4));
    assert_eq!(history[0].player, Player::X);
    assert_eq!(history[1].player, Player::O);
    assert_eq!(history[2].player, Player::X);
}

#[tokio::test]
async fn test_events_mirror_the_match() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut duel = offline_duel(6, 100).with_events(tx);
    let outcome = duel.run().await;
    let events = drain(&mut rx);

    let made: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            DuelEvent::MoveMade {
                number,
                player,
                position,
                ..
            } => Some((*number, *player, *position)),
            _ => None,
        })
        .collect();
    let history = duel.board().history();
    assert_eq!(made.len(), history.len());
    for (idx, (number, player, position)) in made.iter().enumerate() {
        assert_eq!(*number, idx + 1);
        assert_eq!(*player, history[idx].player);
        assert_eq!(*position, history[idx].position);
    }

    let started = events
        .iter()
        .filter(|event| matches!(event, DuelEvent::TurnStarted { .. }))
        .count();
    assert_eq!(started, history.len());

    match events.last() {
        Some(DuelEvent::Finished(reported)) => assert_eq!(*reported, outcome),
        other => panic!("last event should be Finished, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejects_swapped_agents() {
    let result = Duel::new(
        Board::new(6).unwrap(),
        GomokuAgent::offline("a", Player::O),
        GomokuAgent::offline("b", Player::X),
        10,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_rejects_zero_move_cap() {
    let result = Duel::new(
        Board::new(6).unwrap(),
        GomokuAgent::offline("a", Player::X),
        GomokuAgent::offline("b", Player::O),
        0,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_from_config_offline_uses_configured_names() {
    let mut config = DuelConfig::default();
    config.set_turn_delay_ms(0);
    config.set_max_moves(2);
    let mut duel = Duel::from_config(&config, true).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    duel = duel.with_events(tx);

    assert_eq!(duel.run().await, DuelOutcome::MoveLimit { moves: 2 });
    let names: Vec<String> = drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            DuelEvent::TurnStarted { agent, .. } => Some(agent),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["AI Player 1", "AI Player 2"]);
}

/// Proposer that walks a fixed list and offers the first cell still empty.
struct ScriptedProposer {
    cells: Vec<Position>,
}

#[async_trait::async_trait]
impl MoveProposer for ScriptedProposer {
    async fn propose(
        &self,
        _board: &Board,
        _player: Player,
        empty_positions: &[Position],
    ) -> Result<Position, ProposalError> {
        self.cells
            .iter()
            .copied()
            .find(|pos| empty_positions.contains(pos))
            .ok_or(ProposalError::Disabled)
    }

    fn label(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn test_tactics_finish_what_proposals_start() {
    // X is steered along row 1 from column 2, O around the far corner.
    let x = ScriptedProposer {
        cells: (2..9).chain(0..2).map(|col| Position::new(1, col)).collect(),
    };
    let o = ScriptedProposer {
        cells: vec![
            Position::new(8, 8),
            Position::new(8, 6),
            Position::new(6, 8),
            Position::new(8, 4),
            Position::new(4, 8),
            Position::new(6, 6),
        ],
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut duel = Duel::new(
        Board::new(9).unwrap(),
        GomokuAgent::new("x", Player::X, Box::new(x)),
        GomokuAgent::new("o", Player::O, Box::new(o)),
        100,
    )
    .unwrap()
    .with_events(tx);

    let outcome = duel.run().await;
    let sources: Vec<(Player, Position, DecisionSource)> = drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            DuelEvent::MoveMade {
                player,
                position,
                source,
                ..
            } => Some((player, position, source)),
            _ => None,
        })
        .collect();

    // X's open four on (1,2)..(1,5) can be completed at (1,1) or (1,6).
    // O blocks the first, X wins through the second.
    assert!(sources.contains(&(Player::O, Position::new(1, 1), DecisionSource::Block)));
    assert!(matches!(outcome, DuelOutcome::Won { player: Player::X, .. }));
    assert_eq!(
        *sources.last().unwrap(),
        (Player::X, Position::new(1, 6), DecisionSource::Win)
    );
    assert_eq!(sources.len(), 9);
}
