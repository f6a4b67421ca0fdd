use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transfer::TransferType;
use crate::wizard::DEFAULT_FETCH_TIMEOUT;
use crate::{Result, TransferError};

pub const APP_DIR: &str = "content-transfer";
pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.json";

/// User preferences, persisted as TOML.
///
/// Storage location is `<config dir>/content-transfer/config.toml`, where
/// the config dir is the platform one (`$XDG_CONFIG_HOME` or
/// `$HOME/.config` on Linux).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransferConfig {
    /// Where the selection is saved between runs
    pub session_file: Option<PathBuf>,
    pub default_transfer_type: Option<TransferType>,
    pub fetch_timeout_secs: Option<u64>,
}

impl TransferConfig {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                TransferError::Config(
                    "unable to determine config directory".to_owned(),
                )
            })
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load the configuration from `path`, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TransferConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        log::info!("config: saved to {}", path.display());
        Ok(())
    }

    pub fn session_file(&self) -> Result<PathBuf> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(SESSION_FILE)),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn transfer_type(&self) -> TransferType {
        self.default_transfer_type
            .unwrap_or(TransferType::RemoteImport)
    }
}
