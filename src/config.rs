use crate::constants::{DEFAULT_SERVER_URL, SERVER_URL_ENV};
use crate::errors::{ParleyError, ParleyResult};
use flexi_logger::LogSpecification;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub storage: StorageBackend,
    pub history_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            storage: StorageBackend::File,
            history_dir: env::temp_dir().join("parley"),
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Loads `~/.config/parley/config.json`, writing the defaults there first if
/// the file does not exist yet. `PARLEY_SERVER_URL` wins over the file.
pub fn load_config() -> ParleyResult<Config> {
    let config_path = get_config_path()?;
    let mut config = load_config_from(&config_path)?;

    if let Ok(url) = env::var(SERVER_URL_ENV) {
        config.server_url = url;
    }

    validate_config(&config)?;
    Ok(config)
}

pub fn load_config_from(config_path: &Path) -> ParleyResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|e| {
            ParleyError::config_error(format!("Failed to read config file: {}", e))
        })?;

        return Ok(serde_json::from_str(&config_str)?);
    }

    let config = Config::default();

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ParleyError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(&config)?;

    fs::write(config_path, config_str)
        .map_err(|e| ParleyError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(config)
}

fn get_config_path() -> ParleyResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ParleyError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("parley").join("config.json"))
}

pub fn validate_config(config: &Config) -> ParleyResult<()> {
    let url = config.server_url.trim();
    if url.is_empty() {
        return Err(ParleyError::config_error("server_url is required"));
    }

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ParleyError::config_error(format!(
            "server_url must be an http(s) URL, got {}",
            url
        )));
    }

    if let Err(e) = LogSpecification::parse(&config.log_level) {
        return Err(ParleyError::config_error(format!(
            "Invalid log_level {:?}: {}",
            config.log_level, e
        )));
    }

    Ok(())
}
