//! The staged diff handed to the LLM.

use std::fmt;

/// Unified diff text of the staged changes, as produced by `git diff --cached`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedDiff {
    text: String,
}

impl StagedDiff {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// A diff with no changes at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether there is nothing to summarize (blank after trimming whitespace).
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for StagedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
