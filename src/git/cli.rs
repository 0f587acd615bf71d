//! Git access through the system `git` binary.
//!
//! Shelling out inherits the user's git config, hooks and signing setup,
//! which `git commit` in particular depends on.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::error::GitError;

/// Read staged changes and record commits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitRepository: Send + Sync {
    /// The staged diff (`git diff --cached`).
    async fn get_diff(&self) -> Result<StagedDiff, GitError>;

    /// Commit the staged changes with `message`. Returns whether git succeeded.
    async fn commit(&self, message: &CommitMessage) -> bool;
}

/// [`GitRepository`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Run git commands inside `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run git with `args` and return stdout.
    async fn run_git(&self, args: &[&str], operation: &'static str) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| GitError::SpawnFailed { operation, source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl GitRepository for GitCli {
    async fn get_diff(&self) -> Result<StagedDiff, GitError> {
        let text = self.run_git(&["diff", "--cached"], "diff").await?;
        debug!("Staged diff is {} bytes", text.len());
        Ok(StagedDiff::new(text))
    }

    async fn commit(&self, message: &CommitMessage) -> bool {
        match self
            .run_git(&["commit", "-m", message.content()], "commit")
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}
