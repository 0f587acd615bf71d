//! Claude Code CLI backend.
//!
//! Runs `claude --print`, feeds the prompt on stdin and reads the complete
//! plain-text answer from stdout once the process exits.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::commit::prompt::build_cli_prompt;
use crate::error::{BackendError, ConfigError, ParseError, TransportError};
use crate::llm::backend::{Backend, ProgressSink};
use crate::llm::extract::extract_last_code_block;
use crate::llm::model::ModelId;

const PROGRAM: &str = "claude";

/// The only model this backend reports; the CLI picks the actual model itself.
pub const CLAUDE_CODE_MODEL: &str = "claude-code";

/// Status shown while the CLI runs. It produces no partial output.
const STATUS_TEXT: &str = "Generating with Claude Code...";

/// Check if Claude Code CLI is installed and accessible.
///
/// Uses the `which` crate for cross-platform executable detection.
pub fn check_claude_installed() -> Result<(), ConfigError> {
    if which::which(PROGRAM).is_err() {
        return Err(ConfigError::ExecutableNotFound {
            program: PROGRAM,
            hint: "Install with: npm install -g @anthropic-ai/claude-code",
        });
    }
    Ok(())
}

/// Backend that shells out to the Claude Code CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeBackend {
    program: PathBuf,
}

impl Default for ClaudeCodeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCodeBackend {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(PROGRAM),
        }
    }

    /// Use a different executable, e.g. a wrapper script.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the CLI with `prompt` on stdin and return stdout.
    async fn run(&self, prompt: &str) -> Result<String, TransportError> {
        let mut child = Command::new(&self.program)
            .arg("--print")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransportError::SpawnFailed {
                program: PROGRAM,
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| TransportError::StdinFailed {
            program: PROGRAM,
            source: std::io::Error::other("stdin was not captured"),
        })?;

        // Write and drain concurrently so a chatty child cannot block on a full pipe.
        let write = async move {
            let result = stdin.write_all(prompt.as_bytes()).await;
            drop(stdin);
            result
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());

        let output = output.map_err(|source| TransportError::SpawnFailed {
            program: PROGRAM,
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(TransportError::NonZeroExit {
                program: PROGRAM,
                code,
                stderr,
            });
        }

        // A child that answers without reading the whole prompt closes the pipe early.
        if let Err(e) = written {
            debug!("{} exited successfully without reading all of stdin: {}", PROGRAM, e);
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl Backend for ClaudeCodeBackend {
    async fn list_models(&self) -> Result<Vec<ModelId>, BackendError> {
        Ok(ModelId::new(CLAUDE_CODE_MODEL).into_iter().collect())
    }

    async fn generate(
        &self,
        diff: &StagedDiff,
        _model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError> {
        let prompt = build_cli_prompt(system_prompt, diff);
        debug!("Running {} --print (prompt length {} chars)", PROGRAM, prompt.len());

        progress.on_progress(STATUS_TEXT);
        let stdout = self.run(&prompt).await?;

        let extracted = extract_last_code_block(&stdout);
        CommitMessage::new(extracted).map_err(|_| ParseError::EmptyMessage.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::backend::NoProgress;

    #[tokio::test]
    async fn test_list_models_reports_fixed_model() {
        let models = ClaudeCodeBackend::new().list_models().await.unwrap();
        assert_eq!(models, vec![ModelId::new(CLAUDE_CODE_MODEL).unwrap()]);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_transport_error() {
        let backend = ClaudeCodeBackend::with_program("nonexistent_command_12345");
        let err = backend
            .generate(
                &StagedDiff::new("+x"),
                &ModelId::new(CLAUDE_CODE_MODEL).unwrap(),
                "prompt",
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BackendError::Transport(TransportError::SpawnFailed { .. })
        ));
    }

    #[test]
    fn test_not_installed_error_mentions_install_hint() {
        let err = ConfigError::ExecutableNotFound {
            program: PROGRAM,
            hint: "Install with: npm install -g @anthropic-ai/claude-code",
        };
        assert!(err.to_string().contains("claude CLI not found"));
    }
}
