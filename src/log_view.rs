use crate::constants::MAX_LOG_ENTRIES;
use chrono::Local;
use std::collections::VecDeque;

/// Recent diagnostics shown beside the chat, oldest first.
#[derive(Debug, Default)]
pub struct LogView {
    pub entries: VecDeque<String>,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: impl AsRef<str>) {
        self.entries
            .push_back(format!("{} {}", Local::now().format("%H:%M:%S"), entry.as_ref()));
        while self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }
}
