//! Automated player: tactical search first, then a proposal, then a fallback.

use crate::agent_config::AgentConfig;
use crate::llm_client::{LlmClient, LlmConfig, LlmError};
use crate::proposal::{LlmProposer, MoveProposer, OfflineProposer};
use derive_more::Display;
use strictly_gomoku::{find_winning_move, strategic_fallback, Board, Player, Position};
use tracing::{debug, info, instrument, warn};

/// Which rule produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DecisionSource {
    /// Completes five in a row for the mover.
    #[display("win")]
    Win,
    /// Occupies the cell where the opponent would complete five.
    #[display("block")]
    Block,
    /// Taken from the move proposer.
    #[display("proposed")]
    Proposed,
    /// Chosen by the deterministic fallback.
    #[display("fallback")]
    Fallback,
}

/// A chosen move and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Cell to play.
    pub position: Position,
    /// Rule that picked it.
    pub source: DecisionSource,
}

impl Decision {
    fn new(position: Position, source: DecisionSource) -> Self {
        Self { position, source }
    }
}

/// One side of a match.
pub struct GomokuAgent {
    name: String,
    player: Player,
    proposer: Box<dyn MoveProposer>,
}

impl std::fmt::Debug for GomokuAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GomokuAgent")
            .field("name", &self.name)
            .field("player", &self.player)
            .field("proposer", &self.proposer.label())
            .finish()
    }
}

impl GomokuAgent {
    /// Creates an agent with an explicit proposer.
    pub fn new(name: impl Into<String>, player: Player, proposer: Box<dyn MoveProposer>) -> Self {
        let name = name.into();
        info!(agent = %name, player = %player, proposer = proposer.label(), "Creating agent");
        Self {
            name,
            player,
            proposer,
        }
    }

    /// Creates an agent that asks the configured model server for proposals.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the HTTP client cannot be built.
    #[instrument(skip_all, fields(agent = %config.name(), player = %player))]
    pub fn from_config(config: &AgentConfig, player: Player) -> Result<Self, LlmError> {
        let client = LlmClient::new(LlmConfig::from(config))?;
        Ok(Self::new(
            config.name().clone(),
            player,
            Box::new(LlmProposer::new(client)),
        ))
    }

    /// Creates an agent that never contacts a model server.
    pub fn offline(name: impl Into<String>, player: Player) -> Self {
        Self::new(name, player, Box::new(OfflineProposer))
    }

    /// Agent name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol this agent plays.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Chooses the next move.
    ///
    /// In priority order: a cell that wins immediately, a cell that stops
    /// the opponent winning immediately, the proposer's suggestion, then
    /// the deterministic fallback. Returns `None` only when the board has
    /// no empty cell. The board is borrowed mutably for speculative
    /// placements but is unchanged when this returns.
    #[instrument(skip_all, fields(agent = %self.name, player = %self.player))]
    pub async fn decide(&self, board: &mut Board) -> Option<Decision> {
        let empty = board.empty_positions();
        if empty.is_empty() {
            warn!("No valid moves available");
            return None;
        }

        if let Some(pos) = find_winning_move(board, self.player, &empty) {
            info!(position = %pos, "Found winning move");
            return Some(Decision::new(pos, DecisionSource::Win));
        }

        if let Some(pos) = find_winning_move(board, self.player.opponent(), &empty) {
            info!(position = %pos, "Blocking opponent's winning move");
            return Some(Decision::new(pos, DecisionSource::Block));
        }

        debug!(proposer = self.proposer.label(), "Requesting proposal");
        match self.proposer.propose(board, self.player, &empty).await {
            Ok(pos) if empty.contains(&pos) => {
                return Some(Decision::new(pos, DecisionSource::Proposed));
            }
            Ok(pos) => {
                warn!(position = %pos, "Proposer returned an unavailable cell");
            }
            Err(e) => {
                warn!(error = %e, "No usable proposal");
            }
        }

        let pos = strategic_fallback(board, &empty)?;
        info!(position = %pos, "Choosing strategic fallback");
        Some(Decision::new(pos, DecisionSource::Fallback))
    }
}
