//! Server configuration.
//!
//! Loaded from TOML; every field is optional and falls back to its default:
//!
//! ```toml
//! max_data_len = 1048575
//! max_batch_ops = 1000
//! queue_depth = 1024
//! worker_name = "arbor-session"
//! ```

use std::path::Path;

use arbor_transaction::{ExecutorLimits, DEFAULT_MAX_DATA_LEN};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Default upper bound on operations per batch.
pub const DEFAULT_MAX_BATCH_OPS: usize = 1000;

/// Default capacity of a session's submission queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 1024;

/// Per-server settings shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Largest accepted payload, in bytes.
    pub max_data_len: usize,
    /// Batches longer than this are rejected without being run.
    pub max_batch_ops: usize,
    /// Submissions a session may have queued. Once full, async submissions
    /// complete with `Unavailable` and sync submissions wait for space.
    pub queue_depth: usize,
    /// Name given to worker threads.
    pub worker_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_data_len: DEFAULT_MAX_DATA_LEN,
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            worker_name: "arbor-session".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_data_len(mut self, max_data_len: usize) -> Self {
        self.max_data_len = max_data_len;
        self
    }

    pub fn with_max_batch_ops(mut self, max_batch_ops: usize) -> Self {
        self.max_batch_ops = max_batch_ops;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn with_worker_name(mut self, worker_name: impl Into<String>) -> Self {
        self.worker_name = worker_name.into();
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> SessionResult<Self> {
        let config: ServerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.max_batch_ops == 0 {
            return Err(SessionError::invalid_config("max_batch_ops must be at least 1"));
        }
        if self.queue_depth == 0 {
            return Err(SessionError::invalid_config("queue_depth must be at least 1"));
        }
        if self.worker_name.is_empty() {
            return Err(SessionError::invalid_config("worker_name must not be empty"));
        }
        Ok(())
    }

    /// Limits handed to the executor.
    pub fn limits(&self) -> ExecutorLimits {
        ExecutorLimits {
            max_data_len: self.max_data_len,
        }
    }
}
