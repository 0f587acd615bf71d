//! Claude Code CLI integration.

pub mod subprocess;

pub use subprocess::{CLAUDE_CODE_MODEL, ClaudeCodeBackend, check_claude_installed};
