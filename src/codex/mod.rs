//! Codex CLI integration.

pub mod response;
pub mod subprocess;

pub use response::find_assistant_text;
pub use subprocess::{CODEX_MODEL, CodexBackend, check_codex_installed, parse_codex_output};
