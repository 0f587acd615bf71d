//! Parsing of Codex CLI JSON-Lines output.

use serde::Deserialize;
use tracing::debug;

/// One line of `codex -q --full-stdout` output. Only assistant messages matter.
#[derive(Deserialize)]
struct CodexLine {
    #[serde(rename = "type")]
    kind: Option<String>,
    role: Option<String>,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl CodexLine {
    fn assistant_text(self) -> Option<String> {
        if self.kind.as_deref() != Some("message") || self.role.as_deref() != Some("assistant") {
            return None;
        }
        self.content
            .into_iter()
            .next()
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
    }
}

/// Find the text of the last assistant message in JSON-Lines output.
///
/// Lines are scanned from the end; lines that are not valid JSON or do not
/// describe an assistant message are skipped.
pub fn find_assistant_text(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .rev()
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| match serde_json::from_str::<CodexLine>(line) {
            Ok(parsed) => parsed.assistant_text(),
            Err(e) => {
                debug!("Skipping non-message Codex output line ({}): {}", e, line);
                None
            }
        })
}
