//! The generated commit message.

use std::fmt;

use crate::error::MessageError;

/// A validated, non-empty commit message.
///
/// Whether the message spans several lines is derived once from the content
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    content: String,
    multi_line: bool,
}

impl CommitMessage {
    /// Create a commit message, rejecting empty or whitespace-only content.
    pub fn new(content: impl Into<String>) -> Result<Self, MessageError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MessageError::EmptyMessage);
        }

        let multi_line = content.contains('\n');
        Ok(Self {
            content,
            multi_line,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_multi_line(&self) -> bool {
        self.multi_line
    }

    /// Render the message as a double-quoted shell argument.
    ///
    /// Single-line messages escape double quotes. Multi-line messages escape
    /// single quotes and encode newlines as a literal `\n`.
    pub fn shell_quoted(&self) -> String {
        if !self.multi_line {
            return format!("\"{}\"", self.content.replace('"', "\\\""));
        }

        format!(
            "\"{}\"",
            self.content.replace('\'', "\\'").replace('\n', "\\n")
        )
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_is_rejected() {
        assert_eq!(CommitMessage::new(""), Err(MessageError::EmptyMessage));
        assert_eq!(CommitMessage::new(String::new()), Err(MessageError::EmptyMessage));
    }

    #[test]
    fn test_whitespace_content_is_rejected() {
        assert_eq!(CommitMessage::new(" \n\t"), Err(MessageError::EmptyMessage));
    }

    #[test]
    fn test_multi_line_is_derived() {
        assert!(CommitMessage::new("a\nb").unwrap().is_multi_line());
        assert!(!CommitMessage::new("a").unwrap().is_multi_line());
    }

    #[test]
    fn test_shell_quoted_single_line_escapes_double_quotes() {
        let msg = CommitMessage::new(r#"fix: handle "quoted" input"#).unwrap();
        assert_eq!(msg.shell_quoted(), r#""fix: handle \"quoted\" input""#);
    }

    #[test]
    fn test_shell_quoted_multi_line_encodes_newlines() {
        let msg = CommitMessage::new("feat: add x\n\nit's done").unwrap();
        assert_eq!(msg.shell_quoted(), r#""feat: add x\n\nit\'s done""#);
    }

    #[test]
    fn test_display_is_raw_content() {
        let msg = CommitMessage::new("chore: bump deps").unwrap();
        assert_eq!(msg.to_string(), "chore: bump deps");
    }
}
