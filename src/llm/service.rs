//! Backend-agnostic commit message generation.

use std::sync::Arc;

use tracing::debug;

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::error::{BackendError, ParseError};
use crate::llm::backend::{Backend, ProgressSink};
use crate::llm::model::ModelId;

/// Message returned for an empty diff without consulting any backend.
pub const NO_CHANGES_MESSAGE: &str = "No staged changes to commit";

/// Dispatches generation to the active backend.
pub struct GenerationService {
    backend: Arc<dyn Backend>,
}

impl GenerationService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Generate a message for `diff`.
    ///
    /// An empty diff short-circuits to [`NO_CHANGES_MESSAGE`]. The interactive
    /// flow never gets here with an empty diff because the use case rejects it
    /// first; the fast path only serves direct callers.
    pub async fn generate_message(
        &self,
        diff: &StagedDiff,
        model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError> {
        if diff.is_empty() {
            debug!("Empty diff, skipping backend call");
            return Ok(CommitMessage::new(NO_CHANGES_MESSAGE).map_err(|_| ParseError::EmptyMessage)?);
        }

        self.backend
            .generate(diff, model, system_prompt, progress)
            .await
    }
}
