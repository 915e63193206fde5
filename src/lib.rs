//! Strictly Duel library - automated gomoku matches
//!
//! Two agents play gomoku on a square board. Each agent picks its move by
//! a fixed priority: win now, block the opponent's immediate win, take a
//! move proposed by a language model, or fall back to a deterministic
//! choice near the existing stones.
//!
//! # Architecture
//!
//! - **Board and rules**: the [`strictly_gomoku`] crate
//! - **LLM client**: streaming requests to an Ollama-style generate endpoint
//! - **Proposal**: prompt construction and reply parsing behind [`MoveProposer`]
//! - **Agent**: the move-selection policy
//! - **Duel**: the match loop, emitting [`DuelEvent`]s
//!
//! # Example
//!
//! ```no_run
//! use strictly_duel::{Duel, DuelConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = DuelConfig::default();
//! let mut duel = Duel::from_config(&config, true)?;
//! let outcome = duel.run().await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod agent_config;
mod duel;
mod duel_config;
mod llm_client;
mod proposal;

// Crate-level exports - Configuration
pub use agent_config::{AgentConfig, ConfigError, ENDPOINT_ENV, MODEL_ENV};
pub use duel_config::DuelConfig;

// Crate-level exports - LLM client
pub use llm_client::stream::{Completion, Fragment, GenerateChunk, StreamDecoder};
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmErrorKind};

// Crate-level exports - Move proposals
pub use proposal::prompt::{render_grid, EMPTY_MARKER, EXAMPLE_POSITIONS, RECENT_MOVES};
pub use proposal::{
    build_prompt, parse_move, CoordinatePattern, LlmProposer, MoveProposer, OfflineProposer,
    ProposalError,
};

// Crate-level exports - Agent and match
pub use agent::{Decision, DecisionSource, GomokuAgent};
pub use duel::{Duel, DuelError, DuelEvent, DuelOutcome};
