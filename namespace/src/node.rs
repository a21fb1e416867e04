//! Namespace nodes.

use std::collections::BTreeSet;

use arbor_core::{Stat, Zxid};

/// A single entry in the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Opaque payload.
    data: Vec<u8>,
    /// Versions and transaction ids.
    stat: Stat,
    /// Names (last segments) of the direct children.
    children: BTreeSet<String>,
}

impl Node {
    /// Create a node as batch `zxid` would.
    pub fn new(data: Vec<u8>, zxid: Zxid) -> Self {
        let stat = Stat::created(zxid, data.len());
        Self {
            data,
            stat,
            children: BTreeSet::new(),
        }
    }

    /// The root node, present before any batch runs.
    pub fn root() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn stat(&self) -> &Stat {
        &self.stat
    }

    pub fn version(&self) -> arbor_core::Version {
        self.stat.version
    }

    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(String::as_str)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains(name)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Replace the payload and bump the data version.
    pub fn set_data(&mut self, data: Vec<u8>, zxid: Zxid) {
        self.stat.touch_data(zxid, data.len());
        self.data = data;
    }

    /// Register a child and bump the child version.
    pub fn add_child(&mut self, name: impl Into<String>, zxid: Zxid) {
        self.children.insert(name.into());
        self.stat.touch_children(zxid, self.children.len());
    }

    /// Unregister a child. Returns false (and changes nothing) if it was not present.
    pub fn remove_child(&mut self, name: &str, zxid: Zxid) -> bool {
        if !self.children.remove(name) {
            return false;
        }
        self.stat.touch_children(zxid, self.children.len());
        true
    }
}
