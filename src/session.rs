//! The interactive commit / regenerate / quit loop.

use std::io;

use tracing::debug;

use crate::commit::generate::GenerateCommitMessage;
use crate::commit::message::CommitMessage;
use crate::error::{GenerateError, SessionError};
use crate::llm::backend::ProgressSink;
use crate::llm::model::ModelId;

/// A command entered at the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Commit,
    Regenerate,
    Quit,
}

impl Choice {
    /// Parse menu input. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "c" => Some(Choice::Commit),
            "r" => Some(Choice::Regenerate),
            "q" => Some(Choice::Quit),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The message was committed.
    Committed(CommitMessage),
    /// The operator quit without committing.
    Quit,
    /// There was nothing staged on the first attempt.
    NothingStaged,
}

/// Everything the loop needs from the terminal.
pub trait Console {
    /// Show the current message and the menu.
    fn show_message(&mut self, message: &CommitMessage);

    /// Read one line of menu input.
    fn read_choice(&mut self) -> io::Result<String>;

    /// Start reporting generation progress. Dropping the sink ends it.
    fn start_progress(&mut self, model: &ModelId) -> Box<dyn ProgressSink>;

    fn info(&mut self, text: &str);

    fn warn(&mut self, text: &str);

    fn success(&mut self, text: &str);
}

/// Drives generation and the menu until the operator commits or quits.
pub struct Session<'a, C: Console> {
    use_case: &'a GenerateCommitMessage,
    model: ModelId,
    system_prompt: String,
    console: C,
}

impl<'a, C: Console> Session<'a, C> {
    pub fn new(
        use_case: &'a GenerateCommitMessage,
        model: ModelId,
        system_prompt: impl Into<String>,
        console: C,
    ) -> Self {
        Self {
            use_case,
            model,
            system_prompt: system_prompt.into(),
            console,
        }
    }

    pub fn into_console(self) -> C {
        self.console
    }

    async fn generate(&mut self) -> Result<CommitMessage, GenerateError> {
        let progress = self.console.start_progress(&self.model);
        let result = self
            .use_case
            .execute(&self.model, &self.system_prompt, progress.as_ref())
            .await;
        drop(progress);

        if result.is_ok() {
            self.console.success("Commit message generated");
        }
        result
    }

    /// Run the loop.
    ///
    /// Nothing staged on the first attempt ends the session with a warning.
    /// Any other first-attempt failure is returned. Later failures only warn.
    pub async fn run(&mut self) -> Result<Outcome, SessionError> {
        let mut current = match self.generate().await {
            Ok(message) => message,
            Err(GenerateError::NothingStaged) => {
                self.console.warn(&GenerateError::NothingStaged.to_string());
                return Ok(Outcome::NothingStaged);
            }
            Err(e) => return Err(e.into()),
        };

        loop {
            self.console.show_message(&current);

            let choice = loop {
                let input = self.console.read_choice()?;
                match Choice::parse(&input) {
                    Some(choice) => break choice,
                    None => {
                        debug!("Unrecognized menu input {:?}", input);
                        self.console.warn("Please choose one of c, r or q");
                    }
                }
            };

            match choice {
                Choice::Commit => {
                    self.console.info("Committing...");
                    if self.use_case.git().commit(&current).await {
                        self.console.success("Commit created");
                        return Ok(Outcome::Committed(current));
                    }
                    self.console
                        .warn("Commit failed. The message was kept, you can retry or regenerate");
                }
                Choice::Regenerate => {
                    self.console.info("Regenerating commit message...");
                    match self.generate().await {
                        Ok(message) => current = message,
                        Err(e) => self.console.warn(&format!("Regeneration failed: {}", e)),
                    }
                }
                Choice::Quit => {
                    self.console.info("Exiting without committing");
                    return Ok(Outcome::Quit);
                }
            }
        }
    }
}
