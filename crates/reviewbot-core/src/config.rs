use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

pub const DEFAULT_SERVER_URL: &str = "https://new-chatbot-emotion-classification.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const SERVER_URL_ENV: &str = "REVIEWBOT_SERVER_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config, writing one with the defaults spelled out on first run
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::get_config_path()?)
    }

    pub fn load_or_create_at(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load_from(config_path);
        }

        let config = Self::with_defaults();
        config.save_to(config_path)?;
        Ok(config)
    }

    fn with_defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Server URL: environment first, then config file, then the hosted default
    pub fn server_url(&self) -> String {
        Self::resolve_server_url(std::env::var(SERVER_URL_ENV).ok(), self)
    }

    fn resolve_server_url(from_env: Option<String>, config: &Config) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| config.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("reviewbot").join("config.json"))
    }
}
