//! Command-line interface for strictly_duel.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strictly_duel::DuelConfig;
use tracing::debug;

/// Strictly Duel - two automated agents playing gomoku
#[derive(Parser, Debug)]
#[command(name = "strictly_duel")]
#[command(about = "Watch two LLM-backed agents play gomoku", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one match and print every move
    Play(PlayArgs),

    /// Print the effective configuration as TOML
    Config {
        /// Path to duel configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Options for a single match. Flags override the config file and environment.
#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Path to duel configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board side length
    #[arg(long)]
    pub size: Option<usize>,

    /// Stop after this many moves
    #[arg(long)]
    pub max_moves: Option<usize>,

    /// Model name for both agents
    #[arg(long)]
    pub model: Option<String>,

    /// Generate endpoint URL for both agents
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds for both agents
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Pause between turns in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Play without a model server (tactics and fallback only)
    #[arg(long)]
    pub offline: bool,
}

impl PlayArgs {
    /// Applies flag overrides on top of `config`.
    pub fn apply_to(&self, config: &mut DuelConfig) {
        if let Some(size) = self.size {
            debug!(size, "Overriding board size");
            config.set_board_size(size);
        }
        if let Some(max_moves) = self.max_moves {
            config.set_max_moves(max_moves);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.set_turn_delay_ms(delay_ms);
        }
        for agent in config.agents_mut() {
            if let Some(model) = &self.model {
                agent.set_model(model.clone());
            }
            if let Some(endpoint) = &self.endpoint {
                agent.set_endpoint(endpoint.clone());
            }
            if let Some(secs) = self.timeout_secs {
                agent.set_request_timeout_secs(secs);
            }
        }
    }
}
