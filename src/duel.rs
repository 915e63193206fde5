//! Match orchestration between two agents.

use crate::agent::{DecisionSource, GomokuAgent};
use crate::duel_config::DuelConfig;
use crate::llm_client::LlmError;
use derive_more::{Display, Error};
use std::time::Duration;
use strictly_gomoku::{Board, BoardError, InvariantSet, MatchInvariants, MoveError, Player, Position};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages sent from the duel to whoever is watching.
#[derive(Debug, Clone)]
pub enum DuelEvent {
    /// An agent is about to choose a move.
    TurnStarted {
        /// 1-based move number.
        number: usize,
        /// Agent name.
        agent: String,
        /// Symbol the agent plays.
        player: Player,
    },
    /// A stone was placed.
    MoveMade {
        /// 1-based move number.
        number: usize,
        /// Agent name.
        agent: String,
        /// Symbol placed.
        player: Player,
        /// Where it was placed.
        position: Position,
        /// Rule that chose the move.
        source: DecisionSource,
        /// Rendered board after the move.
        board: String,
    },
    /// The match ended.
    Finished(DuelOutcome),
}

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DuelOutcome {
    /// An agent completed five in a row.
    #[display("{winner} ({player}) wins after {moves} moves")]
    Won {
        /// Winning agent's name.
        winner: String,
        /// Winning symbol.
        player: Player,
        /// Stones on the board.
        moves: usize,
    },
    /// The board filled with no winner.
    #[display("Draw after {moves} moves")]
    Draw {
        /// Stones on the board.
        moves: usize,
    },
    /// An agent had no move to make. Counts as a draw.
    #[display("Draw: no valid move available after {moves} moves")]
    NoMove {
        /// Stones on the board.
        moves: usize,
    },
    /// An agent's chosen move was rejected by the board.
    #[display("{agent} made an invalid move at {position}: {error}")]
    InvalidMove {
        /// Offending agent's name.
        agent: String,
        /// Rejected position.
        position: Position,
        /// Why it was rejected.
        error: MoveError,
    },
    /// The move cap was reached without a result.
    #[display("Stopped at the {moves}-move limit")]
    MoveLimit {
        /// Stones on the board.
        moves: usize,
    },
}

/// Error setting up a duel.
#[derive(Debug, Clone, Display, Error)]
#[display("Duel error: {} at {}:{}", message, file, line)]
pub struct DuelError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DuelError {
    /// Creates a new duel error with caller location tracking.
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

impl From<BoardError> for DuelError {
    #[track_caller]
    fn from(err: BoardError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<LlmError> for DuelError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(err.to_string())
    }
}

/// Runs one match between an X agent and an O agent.
#[derive(Debug)]
pub struct Duel {
    board: Board,
    agents: [GomokuAgent; 2],
    max_moves: usize,
    turn_delay: Duration,
    event_tx: Option<mpsc::UnboundedSender<DuelEvent>>,
}

impl Duel {
    /// Creates a duel on `board` with no delay and no event channel.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError`] if `player_x` does not play X, `player_o`
    /// does not play O, or `max_moves` is zero.
    #[instrument(skip_all, fields(x = %player_x.name(), o = %player_o.name(), max_moves = max_moves))]
    pub fn new(
        board: Board,
        player_x: GomokuAgent,
        player_o: GomokuAgent,
        max_moves: usize,
    ) -> Result<Self, DuelError> {
        if player_x.player() != Player::X || player_o.player() != Player::O {
            return Err(DuelError::new("First agent must play X and second agent must play O"));
        }
        if max_moves == 0 {
            return Err(DuelError::new("max_moves must be at least 1"));
        }
        info!(board_size = board.size(), "Creating duel");
        Ok(Self {
            board,
            agents: [player_x, player_o],
            max_moves,
            turn_delay: Duration::ZERO,
            event_tx: None,
        })
    }

    /// Creates a duel from configuration.
    ///
    /// With `offline` set neither agent contacts a model server.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError`] if the board or an HTTP client cannot be built.
    #[instrument(skip(config), fields(board_size = config.board_size()))]
    pub fn from_config(config: &DuelConfig, offline: bool) -> Result<Self, DuelError> {
        let board = Board::new(*config.board_size())?;
        let (player_x, player_o) = if offline {
            (
                GomokuAgent::offline(config.player_x().name().clone(), Player::X),
                GomokuAgent::offline(config.player_o().name().clone(), Player::O),
            )
        } else {
            (
                GomokuAgent::from_config(config.player_x(), Player::X)?,
                GomokuAgent::from_config(config.player_o(), Player::O)?,
            )
        };
        Ok(Self::new(board, player_x, player_o, *config.max_moves())?.with_turn_delay(config.turn_delay()))
    }

    /// Sets the pause between turns.
    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    /// Sends progress events to `event_tx`.
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<DuelEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    fn emit(&self, event: DuelEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }

    fn finish(&self, outcome: DuelOutcome) -> DuelOutcome {
        info!(outcome = %outcome, "Duel finished");
        self.emit(DuelEvent::Finished(outcome.clone()));
        outcome
    }

    /// Plays until a win, a full board, a failed turn or the move cap.
    ///
    /// X moves first and turns alternate.
    #[instrument(skip(self), fields(max_moves = self.max_moves))]
    pub async fn run(&mut self) -> DuelOutcome {
        info!("Starting duel");
        let mut current = 0;

        for number in 1..=self.max_moves {
            let agent = &self.agents[current];
            let player = agent.player();
            let name = agent.name().to_string();
            debug!(number, agent = %name, "Turn started");
            self.emit(DuelEvent::TurnStarted {
                number,
                agent: name.clone(),
                player,
            });

            let Some(decision) = agent.decide(&mut self.board).await else {
                warn!(agent = %name, "No valid moves available");
                return self.finish(DuelOutcome::NoMove {
                    moves: self.board.history().len(),
                });
            };

            if let Err(error) = self.board.make_move(decision.position, player) {
                warn!(agent = %name, position = %decision.position, error = %error, "Invalid move");
                return self.finish(DuelOutcome::InvalidMove {
                    agent: name,
                    position: decision.position,
                    error,
                });
            }
            info!(
                number,
                agent = %name,
                position = %decision.position,
                source = %decision.source,
                "Move made"
            );

            if let Err(violations) = MatchInvariants::check_all(&self.board) {
                for violation in violations {
                    warn!(%violation, "Board invariant violated");
                }
            }

            self.emit(DuelEvent::MoveMade {
                number,
                agent: name.clone(),
                player,
                position: decision.position,
                source: decision.source,
                board: self.board.display(),
            });

            if self.board.check_winner(decision.position, player) {
                return self.finish(DuelOutcome::Won {
                    winner: name,
                    player,
                    moves: self.board.history().len(),
                });
            }
            if self.board.is_full() {
                return self.finish(DuelOutcome::Draw {
                    moves: self.board.history().len(),
                });
            }

            current = 1 - current;
            if !self.turn_delay.is_zero() {
                tokio::time::sleep(self.turn_delay).await;
            }
        }

        self.finish(DuelOutcome::MoveLimit {
            moves: self.board.history().len(),
        })
    }
}
