//! Backend selection and dispatch.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::claude::{self, ClaudeCodeBackend};
use crate::codex::{self, CodexBackend};
use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::config::{Config, RemoteSettings};
use crate::error::{BackendError, ConfigError};
use crate::llm::backend::{Backend, ProgressSink};
use crate::llm::model::ModelId;
use crate::openai::ChatCompletionsBackend;

/// Supported backends. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Local OpenAI-compatible server, no authentication.
    Local,
    /// OpenRouter chat-completions API.
    OpenRouter,
    /// Groq chat-completions API.
    Groq,
    /// Claude Code CLI, prompt on stdin, plain-text output.
    ClaudeCode,
    /// Codex CLI, prompt as argument, JSON-Lines output.
    Codex,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Local => "local",
            BackendMode::OpenRouter => "openrouter",
            BackendMode::Groq => "groq",
            BackendMode::ClaudeCode => "claude-code",
            BackendMode::Codex => "codex",
        }
    }

    /// Verify that what the backend needs is present on this machine.
    pub fn check_prerequisites(&self) -> Result<(), ConfigError> {
        match self {
            BackendMode::ClaudeCode => claude::check_claude_installed(),
            BackendMode::Codex => codex::check_codex_installed(),
            BackendMode::Local | BackendMode::OpenRouter | BackendMode::Groq => Ok(()),
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "openrouter" => Ok(Self::OpenRouter),
            "groq" => Ok(Self::Groq),
            "claude-code" | "claude_code" | "claude" => Ok(Self::ClaudeCode),
            "codex" => Ok(Self::Codex),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

/// The closed set of backend implementations.
#[derive(Debug, Clone)]
pub enum LlmBackend {
    ChatCompletions(ChatCompletionsBackend),
    ClaudeCode(ClaudeCodeBackend),
    Codex(CodexBackend),
}

impl LlmBackend {
    /// Build the backend selected by `config.backend`.
    ///
    /// Assumes [`Config::validate`] has passed, so hosted APIs have a key.
    pub fn from_config(config: &Config) -> Self {
        match config.backend {
            BackendMode::Local => {
                LlmBackend::ChatCompletions(ChatCompletionsBackend::local(&config.local.api_base_url))
            }
            BackendMode::OpenRouter => Self::hosted(&config.openrouter),
            BackendMode::Groq => Self::hosted(&config.groq),
            BackendMode::ClaudeCode => LlmBackend::ClaudeCode(ClaudeCodeBackend::new()),
            BackendMode::Codex => LlmBackend::Codex(CodexBackend::new()),
        }
    }

    fn hosted(remote: &RemoteSettings) -> Self {
        LlmBackend::ChatCompletions(ChatCompletionsBackend::authenticated(
            &remote.api_base_url,
            remote.api_key.clone().unwrap_or_default(),
        ))
    }

    fn inner(&self) -> &dyn Backend {
        match self {
            LlmBackend::ChatCompletions(backend) => backend,
            LlmBackend::ClaudeCode(backend) => backend,
            LlmBackend::Codex(backend) => backend,
        }
    }
}

#[async_trait]
impl Backend for LlmBackend {
    async fn list_models(&self) -> Result<Vec<ModelId>, BackendError> {
        self.inner().list_models().await
    }

    async fn generate(
        &self,
        diff: &StagedDiff,
        model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError> {
        self.inner()
            .generate(diff, model, system_prompt, progress)
            .await
    }
}

/// Pick the model for this run.
///
/// An explicitly configured model wins. Otherwise the first model the backend
/// reports is used, and an empty list falls back to `fallback`.
pub async fn resolve_model(
    backend: &dyn Backend,
    configured: Option<ModelId>,
    fallback: ModelId,
) -> Result<ModelId, BackendError> {
    if let Some(model) = configured {
        debug!("Using configured model {}", model);
        return Ok(model);
    }

    let models = backend.list_models().await?;
    debug!("Backend reported {} model(s)", models.len());

    Ok(models.into_iter().next().unwrap_or(fallback))
}
