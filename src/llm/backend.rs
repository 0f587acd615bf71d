//! The capability every LLM backend provides.

use async_trait::async_trait;

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::error::BackendError;
use crate::llm::model::ModelId;

/// Observer for partial output while a message is being generated.
///
/// Receives the cumulative display text so far, with newlines flattened to
/// spaces. Called on the read loop's critical path, so it must not block.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, text: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_progress(&self, text: &str) {
        self(text)
    }
}

/// A sink that ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _text: &str) {}
}

/// Turns a staged diff into a commit message.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Models this backend can serve. May be empty for backends with one
    /// fixed model; callers then fall back to a configured default.
    async fn list_models(&self) -> Result<Vec<ModelId>, BackendError>;

    /// Generate a commit message for `diff`, reporting partial output to `progress`.
    async fn generate(
        &self,
        diff: &StagedDiff,
        model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError>;
}
