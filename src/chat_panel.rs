use crate::{
    api::ChatClient,
    chat_message::ChatMessage,
    errors::ParleyResult,
    message_store::MessageStore,
    storage::ChatHistoryStorage,
};
use log::{debug, error};

/// What `begin_send` decided about the pending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendGate {
    /// Send this text, untrimmed, then report back through `finish_send`.
    Dispatch(String),
    EmptyInput,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty or whitespace; nothing happened.
    Skipped,
    /// Another send is still waiting on the server.
    Busy,
    Replied,
    Failed,
}

/// The chat panel's state: transcript, pending input, and the storage the
/// transcript is mirrored to.
///
/// At most one send is outstanding at a time. The send is split in two so
/// the request can run without holding whatever lock guards the panel.
#[derive(Debug)]
pub struct ChatPanel<S> {
    messages: MessageStore,
    pending_input: String,
    storage: S,
    sending: bool,
}

impl<S: ChatHistoryStorage> ChatPanel<S> {
    /// Builds the panel and hydrates the transcript from `storage`.
    pub fn mount(storage: S) -> Self {
        let mut messages = MessageStore::new();
        messages.hydrate(storage.get_chat_history());
        debug!("Mounted chat panel with {} saved messages", messages.len());

        Self {
            messages,
            pending_input: String::new(),
            storage,
            sending: false,
        }
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.pending_input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.pending_input.pop();
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn begin_send(&mut self) -> SendGate {
        if self.pending_input.trim().is_empty() {
            return SendGate::EmptyInput;
        }
        if self.sending {
            return SendGate::InFlight;
        }

        self.sending = true;
        SendGate::Dispatch(self.pending_input.clone())
    }

    /// Applies the server's answer for `content`, the text `begin_send`
    /// handed out.
    pub fn finish_send(&mut self, content: String, reply: ParleyResult<String>) -> SendOutcome {
        self.sending = false;

        match reply {
            Ok(response) => {
                let user_message = ChatMessage::user(content);
                let ai_message = ChatMessage::assistant(response);

                self.storage.save_chat_message(&user_message);
                self.storage.save_chat_message(&ai_message);
                self.messages.append([user_message, ai_message]);

                self.pending_input.clear();
                SendOutcome::Replied
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                // shown only, never persisted
                self.messages.append([ChatMessage::send_error()]);
                SendOutcome::Failed
            }
        }
    }

    /// Runs a whole send against `client`.
    pub async fn send_message(&mut self, client: &ChatClient) -> SendOutcome {
        match self.begin_send() {
            SendGate::EmptyInput => SendOutcome::Skipped,
            SendGate::InFlight => SendOutcome::Busy,
            SendGate::Dispatch(content) => {
                let reply = client.send_message(&content).await;
                self.finish_send(content, reply)
            }
        }
    }

    pub fn clear_chat(&mut self) {
        self.messages.clear();
        self.storage.clear_chat_history();
    }
}
