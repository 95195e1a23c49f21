use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::services::cover::GOOGLE_BOOKS_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_cover_api_url")]
    pub cover_api_url: String,

    #[serde(default = "default_cover_timeout")]
    pub cover_timeout_secs: u64,

    #[serde(default = "default_cover_lookup_enabled")]
    pub cover_lookup_enabled: bool,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("library-catalog");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("library.sqlite").to_string_lossy().to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:5002".to_string()
}

fn default_cover_api_url() -> String {
    GOOGLE_BOOKS_API_URL.to_string()
}

fn default_cover_timeout() -> u64 {
    5
}

fn default_cover_lookup_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind_address: default_bind_address(),
            cover_api_url: default_cover_api_url(),
            cover_timeout_secs: default_cover_timeout(),
            cover_lookup_enabled: default_cover_lookup_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads the config at `path`, writing out the defaults first if the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("library-catalog")
            .join("config.toml")
    }
}
