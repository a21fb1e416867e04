//! Session error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for `ServerConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// The worker thread could not be started.
    #[error("failed to spawn session worker: {0}")]
    Spawn(#[source] std::io::Error),
}

impl SessionError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type for session setup.
pub type SessionResult<T> = Result<T, SessionError>;
