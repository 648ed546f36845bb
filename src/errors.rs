// src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParleyError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

pub type ParleyResult<T> = Result<T, ParleyError>;

impl ParleyError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        ParleyError::Api(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ParleyError::Config(msg.into())
    }
}
