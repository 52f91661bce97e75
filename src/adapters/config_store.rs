use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{DomainError, ShellConfig};
use crate::ports::ConfigStore;

/// Shell configuration persisted as TOML under the OS application
/// directory.
///
/// macOS keeps config and logs together under Application Support;
/// elsewhere the config lives in the config directory and logs in the
/// data directory.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = Self::default_data_dir().ok_or_else(|| {
            DomainError::Config("could not resolve an application data directory".to_string())
        })?;
        Self::at(data_dir)
    }

    /// Open a store rooted at an explicit directory.
    pub fn at(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;
        info!(data_dir = ?data_dir, "ConfigStore initialized");
        Ok(Self { data_dir })
    }

    fn default_data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("Saybar"))
        }

        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir().map(|p| p.join("Saybar"))
        }
    }
}

impl ConfigStore for TomlConfigStore {
    /// Load the config, writing the defaults out on first run so the user
    /// has a file to edit.
    fn load(&self) -> Result<ShellConfig, DomainError> {
        let path = self.config_path();
        if !path.exists() {
            info!(path = ?path, "No configuration file, creating default");
            let config = ShellConfig::new();
            self.save(&config)?;
            return Ok(config);
        }

        debug!(path = ?path, "Loading configuration");
        let config = toml::from_str(&fs::read_to_string(&path)?)?;
        info!(path = ?path, "Configuration loaded");
        Ok(config)
    }

    fn save(&self, config: &ShellConfig) -> Result<(), DomainError> {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(config)?)?;
        info!(path = ?path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        #[cfg(target_os = "macos")]
        {
            self.data_dir.join("logs")
        }

        #[cfg(not(target_os = "macos"))]
        {
            dirs::data_dir()
                .map(|p| p.join("Saybar").join("logs"))
                .unwrap_or_else(|| self.data_dir.join("logs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_first_load_creates_the_default_file() {
        let temp_dir = env::temp_dir().join("saybar_config_first_load");
        let _ = fs::remove_dir_all(&temp_dir);

        let store = TomlConfigStore::at(temp_dir.clone()).unwrap();
        let config = store.load().unwrap();

        assert!(store.config_path().exists());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.timing.level_interval_ms, 30);

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = env::temp_dir().join("saybar_config_roundtrip");
        let _ = fs::remove_dir_all(&temp_dir);

        let store = TomlConfigStore::at(temp_dir.clone()).unwrap();
        let mut config = ShellConfig::new();
        config.logging.level = "debug".to_string();
        config.timing.level_interval_ms = 45;
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.timing.level_interval_ms, 45);

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
