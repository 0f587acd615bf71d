//! Codex CLI backend.
//!
//! Runs `codex -q --full-stdout <prompt>` and reads the assistant's answer
//! from the JSON-Lines transcript on stdout.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::commit::prompt::build_cli_prompt;
use crate::error::{BackendError, ConfigError, ParseError, TransportError};
use crate::llm::backend::{Backend, ProgressSink};
use crate::llm::extract::extract_last_code_block;
use crate::llm::model::ModelId;

use super::response::find_assistant_text;

const PROGRAM: &str = "codex";

/// The only model this backend reports; the CLI picks the actual model itself.
pub const CODEX_MODEL: &str = "codex";

const STATUS_TEXT: &str = "Generating with Codex...";

/// Check if Codex CLI is installed and accessible.
pub fn check_codex_installed() -> Result<(), ConfigError> {
    if which::which(PROGRAM).is_err() {
        return Err(ConfigError::ExecutableNotFound {
            program: PROGRAM,
            hint: "Install with: npm install -g @openai/codex",
        });
    }
    Ok(())
}

/// Turn Codex stdout into a commit message.
pub fn parse_codex_output(stdout: &str) -> Result<CommitMessage, ParseError> {
    let text = find_assistant_text(stdout).ok_or(ParseError::NoAssistantMessage { program: PROGRAM })?;
    let extracted = extract_last_code_block(&text);
    CommitMessage::new(extracted).map_err(|_| ParseError::EmptyMessage)
}

/// Backend that shells out to the Codex CLI.
#[derive(Debug, Clone)]
pub struct CodexBackend {
    program: PathBuf,
}

impl Default for CodexBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CodexBackend {
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

    /// Run the CLI with `prompt` as its trailing argument and return stdout.
    async fn run(&self, prompt: &str) -> Result<String, TransportError> {
        let output = Command::new(&self.program)
            .arg("-q")
            .arg("--full-stdout")
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| TransportError::SpawnFailed {
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

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl Backend for CodexBackend {
    async fn list_models(&self) -> Result<Vec<ModelId>, BackendError> {
        Ok(ModelId::new(CODEX_MODEL).into_iter().collect())
    }

    async fn generate(
        &self,
        diff: &StagedDiff,
        _model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError> {
        let prompt = build_cli_prompt(system_prompt, diff);
        debug!("Running {} -q --full-stdout (prompt length {} chars)", PROGRAM, prompt.len());

        progress.on_progress(STATUS_TEXT);
        let stdout = self.run(&prompt).await?;

        Ok(parse_codex_output(&stdout)?)
    }
}
