//! # Configuration
//!
//! Application settings stored as TOML under the user's config directory
//! (`~/.config/padbridge/config.toml` on Linux). A missing file is created with
//! defaults on first start; missing keys inside an existing file fall back to
//! their defaults, so older files keep loading after new settings are added.

use crate::backend::BackendSettings;
use crate::error::ConfigError;
use crate::normalizer::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "padbridge";
const CONFIG_FILE: &str = "config.toml";

/// Top-level settings file.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Starting deadzones; callers may change them at runtime
    pub normalizer: NormalizerConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
    pub backend: BackendConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`; `RUST_LOG` wins when set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Printed before each request; empty disables it
    pub prompt: String,
    /// Serve two in-memory pads instead of real hardware
    pub demo: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            demo: false,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Highest pad slot exposed to callers
    pub max_slots: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { max_slots: 4 }
    }
}

impl From<&BackendConfig> for BackendSettings {
    fn from(config: &BackendConfig) -> Self {
        Self {
            max_slots: config.max_slots,
        }
    }
}

impl AppConfig {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read settings from `path`.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| io_error(path, source))?;
        Self::from_toml(&content)
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_error(parent, source))?;
        }

        let content = self.to_toml()?;
        tokio::fs::write(path, content)
            .await
            .map_err(|source| io_error(path, source))?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Load settings from `path`, writing defaults first if the file is missing.
    pub async fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| io_error(path, source))?;

        if exists {
            let config = Self::load(path).await?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            warn!(
                "Config file {} does not exist, writing defaults",
                path.display()
            );
            let config = Self::default();
            config.save(path).await?;
            Ok(config)
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}
