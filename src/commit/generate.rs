//! The "generate a commit message for what is staged" use case.

use std::sync::Arc;

use tracing::debug;

use crate::commit::history::MessageHistory;
use crate::commit::message::CommitMessage;
use crate::error::GenerateError;
use crate::git::GitRepository;
use crate::llm::backend::ProgressSink;
use crate::llm::model::ModelId;
use crate::llm::service::GenerationService;

/// Reads the staged diff, generates a message for it and records the result.
pub struct GenerateCommitMessage {
    git: Arc<dyn GitRepository>,
    service: GenerationService,
    history: Arc<dyn MessageHistory>,
}

impl GenerateCommitMessage {
    pub fn new(
        git: Arc<dyn GitRepository>,
        service: GenerationService,
        history: Arc<dyn MessageHistory>,
    ) -> Self {
        Self {
            git,
            service,
            history,
        }
    }

    pub fn git(&self) -> &Arc<dyn GitRepository> {
        &self.git
    }

    /// Generate a message for the current staged changes.
    ///
    /// Fails with [`GenerateError::NothingStaged`] before contacting the
    /// backend when the diff is empty. The message is saved to history only
    /// on success.
    pub async fn execute(
        &self,
        model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, GenerateError> {
        let diff = self.git.get_diff().await?;
        if diff.is_empty() {
            return Err(GenerateError::NothingStaged);
        }

        debug!("Generating commit message with model {}", model);
        let message = self
            .service
            .generate_message(&diff, model, system_prompt, progress)
            .await?;

        self.history.save(&message);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::diff::StagedDiff;
    use crate::commit::history::{InMemoryHistory, MockMessageHistory};
    use crate::error::{BackendError, GitError, TransportError};
    use crate::git::cli::MockGitRepository;
    use crate::llm::backend::{Backend, NoProgress};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    const DIFF: &str = "diff --git a/a.txt b/a.txt\n+hello\n";

    /// Answers with a fixed message, or fails, and counts calls.
    struct FixedBackend {
        answer: Option<&'static str>,
        calls: AtomicU32,
    }

    impl FixedBackend {
        fn answering(answer: &'static str) -> Arc<Self> {
            Arc::new(Self {
                answer: Some(answer),
                calls: AtomicU32::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: None,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Backend for FixedBackend {
        async fn list_models(&self) -> Result<Vec<ModelId>, BackendError> {
            Ok(Vec::new())
        }

        async fn generate(
            &self,
            diff: &StagedDiff,
            _model: &ModelId,
            _system_prompt: &str,
            _progress: &dyn ProgressSink,
        ) -> Result<CommitMessage, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(diff.as_str(), DIFF);
            match self.answer {
                Some(text) => Ok(CommitMessage::new(text).unwrap()),
                None => Err(TransportError::HttpStatus {
                    status: 500,
                    body: "boom".to_string(),
                }
                .into()),
            }
        }
    }

    fn git_with_diff(diff: &'static str) -> Arc<MockGitRepository> {
        let mut git = MockGitRepository::new();
        git.expect_get_diff()
            .times(1)
            .returning(move || Ok(StagedDiff::new(diff)));
        Arc::new(git)
    }

    fn model() -> ModelId {
        ModelId::new("test-model").unwrap()
    }

    #[tokio::test]
    async fn test_generates_and_saves_to_history() {
        let backend = FixedBackend::answering("feat: add greeting");
        let history = Arc::new(InMemoryHistory::new());
        let use_case = GenerateCommitMessage::new(
            git_with_diff(DIFF),
            GenerationService::new(backend.clone()),
            history.clone(),
        );

        let message = use_case.execute(&model(), "prompt", &NoProgress).await.unwrap();

        assert_eq!(message.content(), "feat: add greeting");
        assert_eq!(history.last(), Some(message));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_diff_is_nothing_staged() {
        let backend = FixedBackend::answering("unused");
        let mut history = MockMessageHistory::new();
        history.expect_save().never();

        let use_case = GenerateCommitMessage::new(
            git_with_diff("  \n"),
            GenerationService::new(backend.clone()),
            Arc::new(history),
        );

        let err = use_case.execute(&model(), "prompt", &NoProgress).await.unwrap_err();

        assert!(matches!(err, GenerateError::NothingStaged));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_saved() {
        let mut history = MockMessageHistory::new();
        history.expect_save().never();

        let use_case = GenerateCommitMessage::new(
            git_with_diff(DIFF),
            GenerationService::new(FixedBackend::failing()),
            Arc::new(history),
        );

        let err = use_case.execute(&model(), "prompt", &NoProgress).await.unwrap_err();
        assert!(matches!(err, GenerateError::Backend(ref e) if e.is_transport()));
    }

    #[tokio::test]
    async fn test_git_failure_propagates() {
        let mut git = MockGitRepository::new();
        git.expect_get_diff().returning(|| {
            Err(GitError::CommandFailed {
                operation: "diff",
                stderr: "fatal: not a git repository".to_string(),
            })
        });

        let use_case = GenerateCommitMessage::new(
            Arc::new(git),
            GenerationService::new(FixedBackend::answering("unused")),
            Arc::new(InMemoryHistory::new()),
        );

        let err = use_case.execute(&model(), "prompt", &NoProgress).await.unwrap_err();
        assert!(matches!(err, GenerateError::Git(_)));
    }
}
