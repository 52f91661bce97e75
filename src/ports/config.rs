use std::path::PathBuf;

use crate::domain::{DomainError, ShellConfig};

/// Port for persisting the shell's own configuration.
///
/// Backend-owned settings (language, devices, shortcut) never pass
/// through here; they travel over the command channel instead.
pub trait ConfigStore: Send + Sync {
    /// Load the config, creating the default one when none exists yet.
    fn load(&self) -> Result<ShellConfig, DomainError>;

    /// Persist the config.
    fn save(&self, config: &ShellConfig) -> Result<(), DomainError>;

    /// Path of the configuration file.
    fn config_path(&self) -> PathBuf;

    /// Application data directory.
    fn data_dir(&self) -> PathBuf;

    /// Directory log files are written to.
    fn logs_dir(&self) -> PathBuf;
}
