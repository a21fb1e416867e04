//! Operation types.

use std::fmt;

use arbor_core::{CreateMode, Version, ANY_VERSION};
use serde::{Deserialize, Serialize};

/// One operation of a batch.
///
/// Paths are kept as submitted; validation (and `BadArguments`) happens
/// per operation so a malformed path is attributed to its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Create a node. Sequential modes append a counter to `path`.
    Create {
        path: String,
        data: Vec<u8>,
        mode: CreateMode,
    },
    /// Delete a childless node.
    Delete { path: String, version: Version },
    /// Replace a node's data.
    SetData {
        path: String,
        data: Vec<u8>,
        version: Version,
    },
    /// Require a node to be at a version; changes nothing.
    Check { path: String, version: Version },
}

impl Op {
    /// Persistent create.
    pub fn create(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::create_with_mode(path, data, CreateMode::Persistent)
    }

    /// Persistent-sequential create.
    pub fn create_sequential(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::create_with_mode(path, data, CreateMode::PersistentSequential)
    }

    pub fn create_with_mode(
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mode: CreateMode,
    ) -> Self {
        Op::Create {
            path: path.into(),
            data: data.into(),
            mode,
        }
    }

    /// Delete; pass [`ANY_VERSION`] to skip the version check.
    pub fn delete(path: impl Into<String>, version: Version) -> Self {
        Op::Delete {
            path: path.into(),
            version,
        }
    }

    /// Set data; pass [`ANY_VERSION`] to skip the version check.
    pub fn set_data(path: impl Into<String>, data: impl Into<Vec<u8>>, version: Version) -> Self {
        Op::SetData {
            path: path.into(),
            data: data.into(),
            version,
        }
    }

    /// Version check.
    pub fn check(path: impl Into<String>, version: Version) -> Self {
        Op::Check {
            path: path.into(),
            version,
        }
    }

    /// The path as submitted.
    pub fn path(&self) -> &str {
        match self {
            Op::Create { path, .. }
            | Op::Delete { path, .. }
            | Op::SetData { path, .. }
            | Op::Check { path, .. } => path,
        }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Op::Create { .. } => OpKind::Create,
            Op::Delete { .. } => OpKind::Delete,
            Op::SetData { .. } => OpKind::SetData,
            Op::Check { .. } => OpKind::Check,
        }
    }

    /// The expected version, if the operation carries one and it is not
    /// [`ANY_VERSION`].
    pub fn expected_version(&self) -> Option<Version> {
        match self {
            Op::Create { .. } => None,
            Op::Delete { version, .. }
            | Op::SetData { version, .. }
            | Op::Check { version, .. } => {
                (*version != ANY_VERSION).then_some(*version)
            }
        }
    }
}

/// Operation tag, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Create,
    Delete,
    SetData,
    Check,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Create => "create",
            OpKind::Delete => "delete",
            OpKind::SetData => "setData",
            OpKind::Check => "check",
        };
        f.write_str(name)
    }
}
