//! Spinner line showing the status and the tail of the streamed answer.

use std::time::Duration;

use console::{Term, measure_text_width};
use indicatif::{ProgressBar, ProgressStyle};

use crate::llm::backend::ProgressSink;

const FALLBACK_WIDTH: usize = 80;
const ELLIPSIS: &str = "...";

/// Columns taken by the spinner frame, the separating spaces and the parentheses.
const DECORATION_WIDTH: usize = 6;

/// Keep as much of the end of `text` as fits in `max_width` columns.
///
/// Truncated text is prefixed with `...`. Newlines become spaces.
pub(crate) fn tail_to_width(text: &str, max_width: usize) -> String {
    let flat = text.replace('\n', " ");
    if measure_text_width(&flat) <= max_width {
        return flat;
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut start = flat.len();
    for (idx, _) in flat.char_indices().rev() {
        if measure_text_width(&flat[idx..]) > budget {
            break;
        }
        start = idx;
    }

    format!("{}{}", ELLIPSIS, &flat[start..])
}

/// An animated spinner that implements [`ProgressSink`].
///
/// Cleared from the terminal when dropped.
pub struct Spinner {
    bar: ProgressBar,
    status: String,
}

impl Spinner {
    pub fn start(status: impl Into<String>) -> Self {
        let status = status.into();
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(status.clone());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, status }
    }

    fn render(&self, tokens: &str, terminal_width: usize) -> String {
        let available = terminal_width
            .saturating_sub(measure_text_width(&self.status))
            .saturating_sub(DECORATION_WIDTH);
        if tokens.is_empty() || available <= ELLIPSIS.len() {
            return self.status.clone();
        }
        format!("{} ({})", self.status, tail_to_width(tokens, available))
    }
}

impl ProgressSink for Spinner {
    fn on_progress(&self, text: &str) {
        let width = match Term::stderr().size_checked() {
            Some((_, cols)) => cols as usize,
            None => FALLBACK_WIDTH,
        };
        self.bar.set_message(self.render(text, width));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
