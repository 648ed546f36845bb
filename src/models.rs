// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Details of one request to the chat server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    /// `None` when no response came back at all.
    pub response_status: Option<u16>,
    pub response_time_ms: u128,
}

/// Body of `POST /api/chat/message`.
#[derive(Debug, Serialize)]
pub struct MessageRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub response: String,
}
