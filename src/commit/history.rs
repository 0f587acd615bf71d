//! Storage for the most recently generated commit message.

use std::sync::Mutex;

use crate::commit::message::CommitMessage;

/// Keeps generated messages around for later lookup.
#[cfg_attr(test, mockall::automock)]
pub trait MessageHistory: Send + Sync {
    fn save(&self, message: &CommitMessage);

    fn last(&self) -> Option<CommitMessage>;
}

/// Single-slot, process-local history. Each save overwrites the previous one.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    last: Mutex<Option<CommitMessage>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageHistory for InMemoryHistory {
    fn save(&self, message: &CommitMessage) {
        let mut slot = self.last.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(message.clone());
    }

    fn last(&self) -> Option<CommitMessage> {
        self.last
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
