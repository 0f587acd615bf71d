//! Commit message values, prompts and the generation use case.

pub mod diff;
pub mod generate;
pub mod history;
pub mod message;
pub mod prompt;

pub use diff::StagedDiff;
pub use generate::GenerateCommitMessage;
pub use history::{InMemoryHistory, MessageHistory};
pub use message::CommitMessage;
pub use prompt::{DEFAULT_SYSTEM_PROMPT, build_cli_prompt, build_user_prompt};
