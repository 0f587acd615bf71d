//! The interactive terminal used by the session loop.

use std::io;

use console::{Term, style};
use dialoguer::Input;

use crate::commit::message::CommitMessage;
use crate::llm::backend::ProgressSink;
use crate::llm::model::ModelId;
use crate::session::Console;
use crate::ui::spinner::Spinner;

const RULE_WIDTH: usize = 30;

/// [`Console`] on stdin/stdout. Restores the cursor when dropped.
pub struct TerminalConsole {
    term: Term,
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print the banner shown once at startup.
    pub fn banner(&mut self, backend: &str) {
        println!(
            "{}",
            style(format!("Git commit message generator - {} mode", backend.to_uppercase()))
                .green()
                .bold()
        );
    }
}

impl Console for TerminalConsole {
    fn show_message(&mut self, message: &CommitMessage) {
        let rule = "-".repeat(RULE_WIDTH);
        println!("\nGenerated commit message:");
        println!("{}", rule);
        println!("{}", style(message.content()).green());
        println!("{}", rule);

        println!("\nChoose an option:");
        println!("{}: commit with the message above", style("c").green());
        println!("{}: regenerate the message", style("r").green());
        println!("{}: quit", style("q").green());
    }

    fn read_choice(&mut self) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt("Enter your choice (c/r/q)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn start_progress(&mut self, model: &ModelId) -> Box<dyn ProgressSink> {
        Box::new(Spinner::start(format!(
            "Generating commit message with {}...",
            model
        )))
    }

    fn info(&mut self, text: &str) {
        println!("{}", text);
    }

    fn warn(&mut self, text: &str) {
        eprintln!("{} {}", style("⚠").yellow(), style(text).yellow());
    }

    fn success(&mut self, text: &str) {
        println!("{} {}", style("✓").green(), text);
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
    }
}
