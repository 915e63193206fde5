//! Streaming client for an Ollama-style `POST /api/generate` endpoint.

pub mod stream;

use crate::agent_config::AgentConfig;
use derive_more::{Display, Error};
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;
use stream::{Completion, StreamDecoder};
use tracing::{debug, error, info, instrument};

/// Connection settings for the model server.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip_all, fields(endpoint = %endpoint, model = %model))]
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        debug!("Creating LLM config");
        Self {
            endpoint,
            model,
            timeout,
        }
    }

    /// Gets the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl From<&AgentConfig> for LlmConfig {
    fn from(config: &AgentConfig) -> Self {
        Self::new(
            config.endpoint().clone(),
            config.model().clone(),
            config.request_timeout(),
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Client for one model server and model.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the HTTP client cannot be built.
    #[instrument(skip(config), fields(model = %config.model))]
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::new(LlmErrorKind::Transport, format!("Failed to build HTTP client: {}", e)))?;
        info!(endpoint = %config.endpoint, "Creating LLM client");
        Ok(Self { config, http })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends `prompt` and collects the streamed reply.
    ///
    /// The whole exchange, including reading the body, is bounded by the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, a non-success status,
    /// or timeout. Undecodable stream lines are skipped, not errors.
    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<Completion, LlmError> {
        match tokio::time::timeout(self.config.timeout, self.stream_generate(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                error!(timeout = ?self.config.timeout, "Generate request timed out");
                Err(LlmError::new(
                    LlmErrorKind::Timeout,
                    format!("No complete reply within {:?}", self.config.timeout),
                ))
            }
        }
    }

    async fn stream_generate(&self, prompt: &str) -> Result<Completion, LlmError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: true,
        };

        debug!(endpoint = %self.config.endpoint, "Sending generate request");
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Generate request failed");
                LlmError::from_reqwest(e, "Generate request failed")
            })?;

        let status = response.status();
        debug!(status = %status, "Received streaming response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, response = %body, "Model server error");
            return Err(LlmError::new(
                LlmErrorKind::Status,
                format!("Model server error {}: {}", status, body),
            ));
        }

        let mut decoder = StreamDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(|e| {
                error!(error = ?e, "Failed to read response stream");
                LlmError::from_reqwest(e, "Failed to read response stream")
            })?;
            decoder.push(&bytes);
        }

        let completion = decoder.finish();
        info!(
            answer_len = completion.answer().len(),
            done = completion.done(),
            done_reason = ?completion.done_reason(),
            "Generated completion"
        );
        Ok(completion)
    }
}

/// Category of an [`LlmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LlmErrorKind {
    /// Connection, request or body read failure.
    #[display("transport")]
    Transport,
    /// The server answered with a non-success status.
    #[display("status")]
    Status,
    /// The exchange did not finish in time.
    #[display("timeout")]
    Timeout,
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM {} error: {} at {}:{}", kind, message, file, line)]
pub struct LlmError {
    /// Error category.
    pub kind: LlmErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    #[track_caller]
    fn from_reqwest(err: reqwest::Error, context: &str) -> Self {
        let kind = if err.is_timeout() {
            LlmErrorKind::Timeout
        } else {
            LlmErrorKind::Transport
        };
        Self::new(kind, format!("{}: {}", context, err))
    }
}
