use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Timing knobs for the UI shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum interval between level meter updates in ms.
    pub level_interval_ms: u64,
    /// How long the completed status stays on screen before clearing.
    pub ready_clear_ms: u64,
    /// How long the failed status stays on screen before clearing.
    pub error_clear_ms: u64,
    /// Cooldown window guarding the record toggle against double clicks.
    pub toggle_cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            level_interval_ms: 30,
            ready_clear_ms: 1_500,
            error_clear_ms: 4_000,
            toggle_cooldown_ms: 400,
        }
    }
}

/// Shell configuration.
///
/// Covers only this crate's own concerns (logging, UI timing). User-facing
/// settings such as language or the selected device are owned by the
/// backend and travel through the command gateway instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    pub logging: LoggingConfig,
    pub timing: TimingConfig,
}

impl ShellConfig {
    /// Create a new ShellConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults() {
        let timing = TimingConfig::default();
        assert_eq!(timing.level_interval_ms, 30);
        assert!(timing.error_clear_ms > timing.ready_clear_ms);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file_logging);
        assert_eq!(config.timing.level_interval_ms, 30);
    }
}
