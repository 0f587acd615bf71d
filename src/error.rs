//! Error types for commitcraft modules using thiserror.

use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error(
        "Invalid backend '{0}'. Must be one of: local, openrouter, groq, claude-code, codex"
    )]
    InvalidBackend(String),

    #[error(
        "{backend} backend requires an API key. Set the {env_var} environment variable or `api_key` in the [{section}] config section"
    )]
    MissingApiKey {
        backend: String,
        env_var: &'static str,
        section: &'static str,
    },

    #[error("{program} CLI not found. {hint}")]
    ExecutableNotFound {
        program: &'static str,
        hint: &'static str,
    },

    #[error("Invalid model identifier: {0}")]
    InvalidModel(#[source] MessageError),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed {
        operation: &'static str,
        stderr: String,
    },
}

/// Errors from constructing value objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Commit message must be a non-empty string")]
    EmptyMessage,

    #[error("Model identifier must be a non-empty string")]
    EmptyModelId,
}

/// A backend could not be reached or did not complete successfully.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to read response stream: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("Failed to start {program}: {source}")]
    SpawnFailed {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write prompt to {program}: {source}")]
    StdinFailed {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {stderr}")]
    NonZeroExit {
        program: &'static str,
        code: i32,
        stderr: String,
    },
}

/// A backend answered but its output could not be turned into a message.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No assistant message found in {program} output")]
    NoAssistantMessage { program: &'static str },

    #[error("Backend produced an empty commit message")]
    EmptyMessage,

    #[error("Failed to decode model list: {0}")]
    ModelList(String),
}

/// Errors returned by a backend adapter.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl BackendError {
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, BackendError::Parse(_))
    }
}

/// Errors from the commit message generation use case.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No staged changes to commit. Stage files with `git add` first.")]
    NothingStaged,

    #[error("Failed to collect staged diff: {0}")]
    Git(#[from] GitError),

    #[error("Failed to generate commit message: {0}")]
    Backend(#[from] BackendError),
}

/// Errors that end an interactive session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}
