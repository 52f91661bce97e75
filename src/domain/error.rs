use thiserror::Error;

/// Domain-level errors for Saybar.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Command '{name}' failed: {message}")]
    Command { name: String, message: String },

    #[error("Malformed '{topic}' payload: {message}")]
    MalformedEvent { topic: String, message: String },

    #[error("Topic '{0}' is already subscribed")]
    DuplicateSubscription(String),

    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model already installed: {0}")]
    ModelInstalled(String),
}

impl DomainError {
    /// Build a command failure from the transport's error payload.
    pub fn command(name: &str, message: impl Into<String>) -> Self {
        DomainError::Command {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Build a malformed-event error for a topic.
    pub fn malformed(topic: &str, message: impl Into<String>) -> Self {
        DomainError::MalformedEvent {
            topic: topic.to_string(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
