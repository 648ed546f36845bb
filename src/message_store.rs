use crate::chat_message::ChatMessage;

/// Ordered transcript backing the chat view.
///
/// Display order is insertion order. Entries are only ever appended, or all
/// dropped at once by [`MessageStore::clear`]. Every mutation bumps
/// `revision` so the view can tell when it has to re-render and re-scroll.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with whatever storage handed back at mount.
    pub fn hydrate(&mut self, initial: Option<Vec<ChatMessage>>) {
        self.messages = initial.unwrap_or_default();
        self.revision += 1;
    }

    pub fn append<I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        let before = self.messages.len();
        self.messages.extend(messages);
        if self.messages.len() != before {
            self.revision += 1;
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.revision += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut store = MessageStore::new();
        store.append([ChatMessage::user("a"), ChatMessage::assistant("b")]);
        store.append([ChatMessage::user("c")]);

        let contents: Vec<&str> = store.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hydrate_replaces_contents() {
        let mut store = MessageStore::new();
        store.append([ChatMessage::user("old")]);

        let saved = vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there")];
        store.hydrate(Some(saved.clone()));
        assert_eq!(store.as_slice(), saved.as_slice());

        store.hydrate(None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_empties_and_is_idempotent() {
        let mut store = MessageStore::new();
        store.append([ChatMessage::user("a")]);
        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut store = MessageStore::new();
        let start = store.revision();

        store.append(Vec::new());
        assert_eq!(store.revision(), start);

        store.append([ChatMessage::user("a")]);
        assert!(store.revision() > start);

        let after_append = store.revision();
        store.clear();
        assert!(store.revision() > after_append);
    }
}
