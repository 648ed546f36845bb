// Server endpoint
pub const CHAT_MESSAGE_PATH: &str = "/api/chat/message";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

// Shown in place of a reply when the request fails; never persisted.
pub const SEND_ERROR_MESSAGE: &str = "Sorry, there was an error processing your message.";

// Environment overrides
pub const SERVER_URL_ENV: &str = "PARLEY_SERVER_URL";
pub const SESSION_ENV: &str = "PARLEY_SESSION";

// UI
pub const INPUT_PLACEHOLDER: &str = "Type a message...";
pub const MAX_LOG_ENTRIES: usize = 200;
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
