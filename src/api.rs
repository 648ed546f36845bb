use crate::{
    constants::CHAT_MESSAGE_PATH,
    errors::{ParleyError, ParleyResult},
    logging::log_api_call,
    models::{ApiCallLog, MessageRequest, MessageResponse},
};
use chrono::Utc;
use reqwest::Client;
use std::time::Instant;

/// Talks to the chat server's message endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Self {
        let endpoint = format!("{}{}", server_url.trim_end_matches('/'), CHAT_MESSAGE_PATH);
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `content` as-is and returns the server's reply text.
    ///
    /// Transport failures, non-2xx statuses and bodies without a string
    /// `response` field all come back as [`ParleyError::Api`].
    pub async fn send_message(&self, content: &str) -> ParleyResult<String> {
        let started = Instant::now();
        let result = self.post(content).await;

        let status = match &result {
            Ok((status, _)) => Some(*status),
            Err(CallFailure { status, .. }) => *status,
        };
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: self.endpoint.clone(),
            request_summary: format!("{} chars", content.chars().count()),
            response_status: status,
            response_time_ms: started.elapsed().as_millis(),
        });

        result
            .map(|(_, reply)| reply)
            .map_err(|failure| failure.error)
    }

    async fn post(&self, content: &str) -> Result<(u16, String), CallFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&MessageRequest { content })
            .send()
            .await
            .map_err(|e| CallFailure::new(None, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CallFailure::new(
                Some(status.as_u16()),
                format!("Server returned error: {} - {}", status, error_text),
            ));
        }

        let body: MessageResponse = response.json().await.map_err(|e| {
            CallFailure::new(
                Some(status.as_u16()),
                format!("Failed to parse server response: {}", e),
            )
        })?;

        Ok((status.as_u16(), body.response))
    }
}

struct CallFailure {
    status: Option<u16>,
    error: ParleyError,
}

impl CallFailure {
    fn new(status: Option<u16>, msg: String) -> Self {
        Self {
            status,
            error: ParleyError::api_error(msg),
        }
    }
}
