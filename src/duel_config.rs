//! Match configuration: board, limits and the two agents.

use crate::agent_config::{AgentConfig, ConfigError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_gomoku::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use tracing::{debug, info, instrument};

/// Settings for one AI-vs-AI match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DuelConfig {
    /// Board side length.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Moves after which the match is stopped without a result.
    #[serde(default = "default_max_moves")]
    max_moves: usize,

    /// Pause between turns so an operator can follow along.
    #[serde(default = "default_turn_delay_ms")]
    turn_delay_ms: u64,

    /// Agent playing X (moves first).
    #[serde(default = "default_player_x")]
    player_x: AgentConfig,

    /// Agent playing O.
    #[serde(default = "default_player_o")]
    player_o: AgentConfig,
}

fn default_board_size() -> usize {
    6
}

fn default_max_moves() -> usize {
    100
}

fn default_turn_delay_ms() -> u64 {
    500
}

fn default_player_x() -> AgentConfig {
    AgentConfig::new("AI Player 1".to_string())
}

fn default_player_o() -> AgentConfig {
    AgentConfig::new("AI Player 2".to_string())
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            max_moves: default_max_moves(),
            turn_delay_ms: default_turn_delay_ms(),
            player_x: default_player_x(),
            player_o: default_player_o(),
        }
    }
}

impl DuelConfig {
    /// Loads configuration from TOML file.
    ///
    /// Missing keys fall back to defaults; the result is validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading duel config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            board_size = config.board_size,
            max_moves = config.max_moves,
            "Duel config loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }

    /// Checks board size, move limit and both agents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::new(format!(
                "Board size {} is too small (minimum {})",
                self.board_size, MIN_BOARD_SIZE
            )));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::new(format!(
                "Board size {} is too large (maximum {})",
                self.board_size, MAX_BOARD_SIZE
            )));
        }
        if self.max_moves == 0 {
            return Err(ConfigError::new("max_moves must be at least 1"));
        }
        self.player_x.validate()?;
        self.player_o.validate()?;
        Ok(())
    }

    /// Pause between turns as a [`Duration`].
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Replaces the board size.
    pub fn set_board_size(&mut self, size: usize) {
        self.board_size = size;
    }

    /// Replaces the move limit.
    pub fn set_max_moves(&mut self, max_moves: usize) {
        self.max_moves = max_moves;
    }

    /// Replaces the pause between turns.
    pub fn set_turn_delay_ms(&mut self, delay_ms: u64) {
        self.turn_delay_ms = delay_ms;
    }

    /// Mutable access to both agents, X first.
    pub fn agents_mut(&mut self) -> [&mut AgentConfig; 2] {
        [&mut self.player_x, &mut self.player_o]
    }

    /// Applies environment overrides to both agents.
    pub fn apply_env_overrides(&mut self) {
        for agent in self.agents_mut() {
            agent.apply_env_overrides();
        }
    }
}
