//! Commit message extraction from raw LLM output.
//!
//! Every backend asks the model to wrap its final answer in a fenced code
//! block. Models tend to think out loud first and may emit several blocks
//! (drafts, examples), so the answer is taken from the last one.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Opening fence with optional language tag, lazily matched body, closing fence.
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n]*\n(.*?)```").expect("Invalid regex"));

/// Return the trimmed content of the last fenced code block in `text`.
///
/// Falls back to the whole trimmed text when there is no fenced block, or
/// when the last block has no content at all.
pub fn extract_last_code_block(text: &str) -> String {
    let last = CODE_BLOCK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .last();

    match last {
        Some(body) if !body.as_str().is_empty() => body.as_str().trim().to_string(),
        _ => text.trim().to_string(),
    }
}
