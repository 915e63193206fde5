//! Agent configuration: identity and model-server settings.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the model-server endpoint.
pub const ENDPOINT_ENV: &str = "STRICTLY_DUEL_ENDPOINT";

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "STRICTLY_DUEL_MODEL";

/// Configuration for one automated player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name (shown in logs and results).
    name: String,

    /// Full URL of the streaming generate endpoint.
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Model identifier passed to the model server.
    #[serde(default = "default_model")]
    model: String,

    /// Upper bound on one proposal request, in seconds.
    #[serde(default = "default_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "gpt-oss:20b".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl AgentConfig {
    /// Creates a configuration with default endpoint, model and timeout.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn new(name: String) -> Self {
        Self {
            name,
            endpoint: default_endpoint(),
            model: default_model(),
            request_timeout_secs: default_timeout_secs(),
        }
    }

    /// Creates a configuration with explicit model-server settings.
    #[instrument(skip_all, fields(agent_name = %name, model = %model))]
    pub fn with_llm(name: String, endpoint: String, model: String, request_timeout_secs: u64) -> Self {
        Self {
            name,
            endpoint,
            model,
            request_timeout_secs,
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading agent config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(agent_name = %config.name, "Agent config loaded");
        Ok(config)
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty name, endpoint or model, or a
    /// zero timeout.
    #[instrument(skip(self), fields(agent_name = %self.name))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::new("Agent name must not be empty"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::new(format!(
                "Agent {} has an empty endpoint",
                self.name
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::new(format!("Agent {} has an empty model", self.name)));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::new(format!(
                "Agent {} must have a request timeout of at least one second",
                self.name
            )));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Replaces the endpoint.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    /// Replaces the model.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Replaces the request timeout.
    pub fn set_request_timeout_secs(&mut self, secs: u64) {
        self.request_timeout_secs = secs;
    }

    /// Applies `STRICTLY_DUEL_ENDPOINT` / `STRICTLY_DUEL_MODEL` if set.
    #[instrument(skip(self), fields(agent_name = %self.name))]
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            debug!(endpoint = %endpoint, "Endpoint overridden from environment");
            self.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            debug!(model = %model, "Model overridden from environment");
            self.model = model;
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
