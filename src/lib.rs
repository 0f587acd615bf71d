//! commitcraft - A CLI tool that writes git commit messages with an LLM.
//!
//! # Overview
//!
//! commitcraft sends the staged diff to a language-model backend (a local or
//! hosted OpenAI-compatible API, or the Claude Code / Codex CLIs), streams the
//! answer while it is produced, extracts the final message from the last fenced
//! code block and lets the operator commit, regenerate or quit.

pub mod claude;
pub mod codex;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod openai;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use commit::{CommitMessage, GenerateCommitMessage, StagedDiff};
pub use config::Config;
pub use error::{
    BackendError, ConfigError, GenerateError, GitError, MessageError, ParseError, SessionError,
    TransportError,
};
pub use llm::{Backend, BackendMode, LlmBackend, ModelId, ProgressSink};
pub use session::{Outcome, Session};
