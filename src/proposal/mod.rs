//! Move proposals from an external model.
//!
//! A [`MoveProposer`] turns a board into a suggested cell. The LLM-backed
//! implementation renders the board into a prompt, streams the model's
//! reply and parses a coordinate pair out of it. Every failure comes back
//! as a [`ProposalError`] so the caller can fall back to a local choice.

pub mod parse;
pub mod prompt;

use crate::llm_client::{LlmClient, LlmError};
use derive_more::{Display, Error};
use strictly_gomoku::{Board, Player, Position};
use tracing::{debug, info, instrument, warn};

pub use parse::{parse_move, CoordinatePattern};
pub use prompt::build_prompt;

/// Source of suggested moves.
#[async_trait::async_trait]
pub trait MoveProposer: Send + Sync {
    /// Suggests a move for `player`.
    ///
    /// An `Ok` position is always one of `empty_positions`.
    async fn propose(
        &self,
        board: &Board,
        player: Player,
        empty_positions: &[Position],
    ) -> Result<Position, ProposalError>;

    /// Short label for logs.
    fn label(&self) -> &str;
}

/// Why no usable proposal was produced.
#[derive(Debug, Clone, Display, Error)]
pub enum ProposalError {
    /// The model server could not be reached or failed.
    #[display("{_0}")]
    Service(LlmError),
    /// The reply contained no coordinates naming an empty cell.
    #[display("No usable move in reply: {response:?}")]
    Unusable {
        /// Trimmed reply text.
        response: String,
    },
    /// Proposals are switched off.
    #[display("Move proposals are disabled")]
    Disabled,
}

impl From<LlmError> for ProposalError {
    fn from(err: LlmError) -> Self {
        Self::Service(err)
    }
}

/// Proposer backed by a streaming model server.
#[derive(Debug, Clone)]
pub struct LlmProposer {
    client: LlmClient,
}

impl LlmProposer {
    /// Creates a proposer using `client`.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MoveProposer for LlmProposer {
    #[instrument(skip_all, fields(model = %self.client.config().model(), player = %player))]
    async fn propose(
        &self,
        board: &Board,
        player: Player,
        empty_positions: &[Position],
    ) -> Result<Position, ProposalError> {
        let prompt = build_prompt(board, player, empty_positions);
        debug!(prompt_len = prompt.len(), "Prompt built");

        let completion = self.client.generate(&prompt).await?;
        if !completion.thinking().is_empty() {
            debug!(thinking = %completion.thinking(), "Model reasoning");
        }
        debug!(
            response = %completion.answer(),
            done = completion.done(),
            done_reason = ?completion.done_reason(),
            "Model reply"
        );
        if completion.answer().is_empty() {
            warn!("Empty response after streaming");
        }

        match parse_move(completion.answer(), empty_positions) {
            Some(pos) => {
                info!(position = %pos, "Model proposed move");
                Ok(pos)
            }
            None => Err(ProposalError::Unusable {
                response: completion.answer().to_string(),
            }),
        }
    }

    fn label(&self) -> &str {
        self.client.config().model()
    }
}

/// Proposer that never suggests anything, for playing without a model server.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProposer;

#[async_trait::async_trait]
impl MoveProposer for OfflineProposer {
    async fn propose(
        &self,
        _board: &Board,
        _player: Player,
        _empty_positions: &[Position],
    ) -> Result<Position, ProposalError> {
        Err(ProposalError::Disabled)
    }

    fn label(&self) -> &str {
        "offline"
    }
}
