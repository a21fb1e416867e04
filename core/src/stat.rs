//! Node metadata.

use serde::{Deserialize, Serialize};

/// Transaction id. Every committed batch consumes exactly one.
pub type Zxid = i64;

/// Data or child version of a node.
pub type Version = i32;

/// Expected-version sentinel that disables the version check.
pub const ANY_VERSION: Version = -1;

/// Returns true when `expected` admits a node currently at `actual`.
pub fn version_matches(expected: Version, actual: Version) -> bool {
    expected == ANY_VERSION || expected == actual
}

/// Metadata kept alongside every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stat {
    /// Zxid of the batch that created the node.
    pub czxid: Zxid,
    /// Zxid of the batch that last changed the node's data.
    pub mzxid: Zxid,
    /// Zxid of the batch that last added or removed a child.
    pub pzxid: Zxid,
    /// Data version, bumped by every set-data.
    pub version: Version,
    /// Child version, bumped by every child create or delete.
    /// Also the counter sequential creates draw their suffix from.
    pub cversion: Version,
    /// Number of children.
    pub num_children: i32,
    /// Length of the data payload in bytes.
    pub data_length: i32,
}

impl Stat {
    /// Stat of a node created by batch `zxid` with a payload of `data_length` bytes.
    pub fn created(zxid: Zxid, data_length: usize) -> Self {
        Self {
            czxid: zxid,
            mzxid: zxid,
            pzxid: zxid,
            version: 0,
            cversion: 0,
            num_children: 0,
            data_length: clamp_len(data_length),
        }
    }

    /// Record a data replacement made by batch `zxid`.
    pub fn touch_data(&mut self, zxid: Zxid, data_length: usize) {
        self.version += 1;
        self.mzxid = zxid;
        self.data_length = clamp_len(data_length);
    }

    /// Record a child create or delete made by batch `zxid`.
    pub fn touch_children(&mut self, zxid: Zxid, num_children: usize) {
        self.cversion += 1;
        self.pzxid = zxid;
        self.num_children = clamp_len(num_children);
    }
}

fn clamp_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
