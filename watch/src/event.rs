//! Change event types.

use std::fmt;

use arbor_core::{ZPath, Zxid};
use serde::{Deserialize, Serialize};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    NodeCreated,
    NodeDeleted,
    NodeDataChanged,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::NodeCreated => "created",
            EventKind::NodeDeleted => "deleted",
            EventKind::NodeDataChanged => "data-changed",
        };
        f.write_str(name)
    }
}

/// One change to one path, emitted only for committed batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// The changed path.
    pub path: ZPath,
    /// The kind of change.
    pub kind: EventKind,
    /// Zxid of the batch that made the change.
    pub zxid: Zxid,
}

impl WatchEvent {
    pub fn new(path: ZPath, kind: EventKind, zxid: Zxid) -> Self {
        Self { path, kind, zxid }
    }

    pub fn created(path: ZPath, zxid: Zxid) -> Self {
        Self::new(path, EventKind::NodeCreated, zxid)
    }

    pub fn deleted(path: ZPath, zxid: Zxid) -> Self {
        Self::new(path, EventKind::NodeDeleted, zxid)
    }

    pub fn data_changed(path: ZPath, zxid: Zxid) -> Self {
        Self::new(path, EventKind::NodeDataChanged, zxid)
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @{}", self.path, self.kind, self.zxid)
    }
}
