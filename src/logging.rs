// src/logging.rs

use crate::config::Config;
use crate::errors::ParleyResult;
use crate::models::ApiCallLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};
use log::info;

pub const API_CALL_TARGET: &str = "api_calls";

/// Starts file logging. The terminal belongs to the UI, so nothing goes to
/// stderr. Keep the handle alive for the lifetime of the program.
pub fn init_logging(config: &Config) -> ParleyResult<LoggerHandle> {
    let handle = Logger::try_with_str(&config.log_level)?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("parley"),
        )
        .format(detailed_format)
        .start()?;
    Ok(handle)
}

pub fn format_api_call(log: &ApiCallLog) -> String {
    let status = log
        .response_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        status,
        log.response_time_ms
    )
}

pub fn log_api_call(log: &ApiCallLog) {
    info!(target: API_CALL_TARGET, "{}", format_api_call(log));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_api_call() {
        let entry = ApiCallLog {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            endpoint: "http://localhost:3000/api/chat/message".to_string(),
            request_summary: "5 chars".to_string(),
            response_status: Some(200),
            response_time_ms: 42,
        };
        assert_eq!(
            format_api_call(&entry),
            "[2024-05-01T12:00:00+00:00] http://localhost:3000/api/chat/message - 5 chars - Status: 200 - Time: 42ms"
        );
    }

    #[test]
    fn test_format_api_call_without_response() {
        let entry = ApiCallLog {
            timestamp: Utc::now(),
            endpoint: "e".to_string(),
            request_summary: "s".to_string(),
            response_status: None,
            response_time_ms: 0,
        };
        assert!(format_api_call(&entry).contains("Status: none"));
    }
}
