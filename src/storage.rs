// src/storage.rs

use crate::chat_message::ChatMessage;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Session-scoped persistence for the transcript.
///
/// Callers treat every operation as succeeding; implementations report their
/// own I/O trouble through the log.
pub trait ChatHistoryStorage: Send {
    /// Saved messages in display order, or `None` when nothing was saved.
    fn get_chat_history(&self) -> Option<Vec<ChatMessage>>;

    fn save_chat_message(&mut self, message: &ChatMessage);

    fn clear_chat_history(&mut self);
}

impl<T: ChatHistoryStorage + ?Sized> ChatHistoryStorage for Box<T> {
    fn get_chat_history(&self) -> Option<Vec<ChatMessage>> {
        (**self).get_chat_history()
    }

    fn save_chat_message(&mut self, message: &ChatMessage) {
        (**self).save_chat_message(message)
    }

    fn clear_chat_history(&mut self) {
        (**self).clear_chat_history()
    }
}

/// Keeps history for as long as the process lives.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    messages: Option<Vec<ChatMessage>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Some(messages),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.messages.as_deref().unwrap_or_default()
    }
}

impl ChatHistoryStorage for MemoryStorage {
    fn get_chat_history(&self) -> Option<Vec<ChatMessage>> {
        self.messages.clone()
    }

    fn save_chat_message(&mut self, message: &ChatMessage) {
        self.messages
            .get_or_insert_with(Vec::new)
            .push(message.clone());
    }

    fn clear_chat_history(&mut self) {
        self.messages = None;
    }
}

/// Stores one session's history as a JSON array on disk, so a terminal that
/// reattaches with the same session id gets its transcript back.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_session(dir: impl AsRef<Path>, session_id: &str) -> Self {
        Self::new(
            dir.as_ref()
                .join(format!("chat-history-{}.json", session_id)),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable history file is moved before it gets replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// `Ok(None)` when no file exists; unparsable contents are `InvalidData`.
    fn read(&self) -> std::io::Result<Option<Vec<ChatMessage>>> {
        let json_str = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No chat history at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let history = serde_json::from_str(&json_str)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        Ok(Some(history))
    }

    fn write(&self, history: &[ChatMessage]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json_str = serde_json::to_string(history)?;
        fs::write(&self.path, json_str)
    }
}

impl ChatHistoryStorage for JsonFileStorage {
    fn get_chat_history(&self) -> Option<Vec<ChatMessage>> {
        match self.read() {
            Ok(history) => history,
            Err(e) => {
                warn!("Ignoring unreadable chat history {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save_chat_message(&mut self, message: &ChatMessage) {
        let mut history = match self.read() {
            Ok(history) => history.unwrap_or_default(),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                let backup = self.backup_path();
                if let Err(e) = fs::rename(&self.path, &backup) {
                    warn!("Failed to back up chat history {}: {}", self.path.display(), e);
                    return;
                }
                warn!(
                    "Replacing unreadable chat history {} ({}); old contents moved to {}",
                    self.path.display(),
                    e,
                    backup.display()
                );
                Vec::new()
            }
            Err(e) => {
                warn!("Not saving chat message, {} is unreadable: {}", self.path.display(), e);
                return;
            }
        };
        history.push(message.clone());
        if let Err(e) = self.write(&history) {
            warn!("Failed to save chat message to {}: {}", self.path.display(), e);
        }
    }

    fn clear_chat_history(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Cleared chat history at {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear chat history {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get_chat_history().is_none());

        storage.save_chat_message(&ChatMessage::user("Hello"));
        storage.save_chat_message(&ChatMessage::assistant("Hi there"));
        assert_eq!(
            storage.get_chat_history(),
            Some(vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there")])
        );

        storage.clear_chat_history();
        assert!(storage.get_chat_history().is_none());
        assert!(storage.messages().is_empty());
    }

    #[test]
    fn test_file_storage_missing_file_has_no_history() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::for_session(dir.path(), "abc");
        assert!(storage.get_chat_history().is_none());
        assert!(storage.path().ends_with("chat-history-abc.json"));
    }

    #[test]
    fn test_file_storage_appends_in_order() {
        let dir = tempdir().unwrap();
        let mut storage = JsonFileStorage::for_session(dir.path().join("nested"), "s1");

        storage.save_chat_message(&ChatMessage::user("Hello"));
        storage.save_chat_message(&ChatMessage::assistant("Hi there"));

        // a second handle on the same session sees the same transcript
        let reopened = JsonFileStorage::for_session(dir.path().join("nested"), "s1");
        assert_eq!(
            reopened.get_chat_history(),
            Some(vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there")])
        );

        let raw = fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains(r#""sender":"ai""#));
    }

    #[test]
    fn test_file_storage_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut storage = JsonFileStorage::for_session(dir.path(), "s2");
        storage.save_chat_message(&ChatMessage::user("Hello"));

        storage.clear_chat_history();
        assert!(storage.get_chat_history().is_none());
        storage.clear_chat_history();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_ignores_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(storage.get_chat_history().is_none());
    }

    #[test]
    fn test_file_storage_backs_up_corrupt_file_before_saving() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat-history-s3.json");
        fs::write(&path, "{not json").unwrap();

        let mut storage = JsonFileStorage::new(&path);
        storage.save_chat_message(&ChatMessage::user("Hello"));

        let backup = dir.path().join("chat-history-s3.json.corrupt");
        assert_eq!(storage.backup_path(), backup);
        assert_eq!(fs::read_to_string(&backup).unwrap(), "{not json");
        assert_eq!(
            storage.get_chat_history(),
            Some(vec![ChatMessage::user("Hello")])
        );
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn ChatHistoryStorage> = Box::new(MemoryStorage::new());
        storage.save_chat_message(&ChatMessage::user("x"));
        assert_eq!(storage.get_chat_history().map(|h| h.len()), Some(1));
    }
}
