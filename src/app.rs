use crate::{
    api::ChatClient,
    chat_panel::{ChatPanel, SendGate, SendOutcome},
    chat_view::ChatLayout,
    config::{Config, StorageBackend},
    constants::SESSION_ENV,
    errors::ParleyResult,
    log_view::LogView,
    status_indicator::StatusIndicator,
    storage::{ChatHistoryStorage, JsonFileStorage, MemoryStorage},
};
use log::info;
use std::{env, sync::Arc};
use tokio::sync::Mutex;

pub type PanelStorage = Box<dyn ChatHistoryStorage>;

pub struct App {
    pub panel: ChatPanel<PanelStorage>,
    pub logs: LogView,
    pub status_indicator: StatusIndicator,
    pub chat_scroll: u16,
    /// Pin the transcript to its newest line.
    pub follow_latest: bool,
    pub seen_revision: u64,
    /// Filled in by the last draw; used to hit-test mouse clicks.
    pub layout: Option<ChatLayout>,
    pub should_quit: bool,
}

impl App {
    pub fn new(panel: ChatPanel<PanelStorage>) -> Self {
        let mut logs = LogView::new();
        logs.add(format!("Loaded {} messages", panel.messages().len()));
        let seen_revision = panel.messages().revision();

        Self {
            panel,
            logs,
            status_indicator: StatusIndicator::new(),
            chat_scroll: 0,
            follow_latest: true,
            seen_revision,
            layout: None,
            should_quit: false,
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow_latest = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    /// Starts a send if the panel allows one, returning the text to dispatch.
    pub fn request_send(&mut self) -> Option<String> {
        match self.panel.begin_send() {
            SendGate::Dispatch(content) => {
                self.logs.add("Sending message...");
                self.status_indicator.clear_status();
                self.status_indicator.set_thinking(true);
                Some(content)
            }
            SendGate::EmptyInput => None,
            SendGate::InFlight => {
                self.logs.add("Still waiting on the previous reply");
                None
            }
        }
    }

    pub fn complete_send(&mut self, content: String, reply: ParleyResult<String>) -> SendOutcome {
        if let Err(e) = &reply {
            self.logs.add(format!("Error: {}", e));
        }

        let outcome = self.panel.finish_send(content, reply);
        self.status_indicator.set_thinking(false);
        match outcome {
            SendOutcome::Replied => {
                self.logs.add("Reply received");
                self.status_indicator.clear_status();
            }
            SendOutcome::Failed => self.status_indicator.set_status("Request failed"),
            SendOutcome::Skipped | SendOutcome::Busy => {}
        }
        outcome
    }

    pub fn clear_chat(&mut self) {
        self.panel.clear_chat();
        self.chat_scroll = 0;
        self.follow_latest = true;
        self.logs.add("Chat cleared");
    }
}

/// Sends `content` and folds the reply back into the app once it arrives.
/// The app lock is not held while the request is in flight.
pub async fn dispatch_message(app: Arc<Mutex<App>>, client: ChatClient, content: String) {
    let reply = client.send_message(&content).await;
    let mut guard = app.lock().await;
    guard.complete_send(content, reply);
}

/// Picks the storage adapter named by `config`, keyed by `PARLEY_SESSION`.
pub fn open_storage(config: &Config) -> PanelStorage {
    open_storage_for(config, env::var(SESSION_ENV).ok())
}

/// File storage needs a session id to come back to. Without one the history
/// only lives as long as this process.
pub fn open_storage_for(config: &Config, session_id: Option<String>) -> PanelStorage {
    match (config.storage, session_id) {
        (StorageBackend::Memory, _) => Box::new(MemoryStorage::new()),
        (StorageBackend::File, Some(session_id)) => {
            let storage = JsonFileStorage::for_session(&config.history_dir, &session_id);
            info!("Chat history for session {} at {}", session_id, storage.path().display());
            Box::new(storage)
        }
        (StorageBackend::File, None) => {
            info!("{} is not set; chat history is kept for this run only", SESSION_ENV);
            Box::new(MemoryStorage::new())
        }
    }
}
