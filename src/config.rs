use crate::todo::models::Priority;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "todo-listes";

pub const KEYS: [&str; 3] = ["data_file", "default_priority", "log_file"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,
    pub default_priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl Config {
    /// Reads the user's config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_file_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_file_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = toml::to_string(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "data_file" => self.data_file = Some(value.to_string()),
            "default_priority" => {
                self.default_priority = value.parse().map_err(|reason| ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason,
                })?;
            }
            "log_file" => self.log_file = Some(value.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Effective value of `key`, defaults included.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "data_file" => Ok(self.data_file_path()?.display().to_string()),
            "default_priority" => Ok(self.default_priority.to_string()),
            "log_file" => Ok(self.log_file_path()?.display().to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    pub fn data_file_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_file {
            Some(path) => Ok(PathBuf::from(path)),
            None => {
                let data_dir = dirs::data_dir().ok_or(ConfigError::ConfigDirNotFound)?;
                Ok(data_dir.join(APP_DIR).join("lists.json"))
            }
        }
    }

    pub fn log_file_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(PathBuf::from(path)),
            None => {
                let cache_dir = dirs::cache_dir().ok_or(ConfigError::ConfigDirNotFound)?;
                Ok(cache_dir.join(APP_DIR).join("todo-listes.log"))
            }
        }
    }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join(APP_DIR).join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    ConfigDirNotFound,
    #[error("Unknown configuration key '{0}'. Supported keys: data_file, default_priority, log_file")]
    UnknownKey(String),
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}
