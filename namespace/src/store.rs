//! Core namespace storage.

use std::collections::HashMap;
use std::ops::Deref;

use arbor_core::{Stat, ZPath, Zxid};
use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{NamespaceError, NamespaceResult};
use crate::mutation::{Mutation, MutationSet};
use crate::node::Node;

/// The committed tree: every existing node plus the last committed zxid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTree {
    /// Node storage
    nodes: HashMap<ZPath, Node>,
    /// Zxid of the last installed batch
    last_zxid: Zxid,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// A tree holding only the root.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ZPath::root(), Node::root());
        Self {
            nodes,
            last_zxid: 0,
        }
    }

    // ==================== Reads ====================

    /// Get a node, or `None` if no node lives at `path`.
    pub fn get(&self, path: &ZPath) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn exists(&self, path: &ZPath) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn stat(&self, path: &ZPath) -> Option<Stat> {
        self.nodes.get(path).map(|n| *n.stat())
    }

    pub fn last_zxid(&self) -> Zxid {
        self.last_zxid
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &ZPath> {
        self.nodes.keys()
    }

    // ==================== Install ====================

    /// Existence of `path` once `set` is applied.
    fn exists_after(&self, set: &MutationSet, path: &ZPath) -> bool {
        match set.image(path) {
            Some(image) => image.is_some(),
            None => self.exists(path),
        }
    }

    /// Verify that `set` applies cleanly on top of this tree.
    fn check(&self, set: &MutationSet) -> NamespaceResult<()> {
        if set.base_zxid() != self.last_zxid {
            return Err(NamespaceError::StaleMutationSet {
                expected: set.base_zxid(),
                actual: self.last_zxid,
            });
        }

        for (path, image) in set.images() {
            match image {
                Some(node) => {
                    if let Some(parent) = path.parent() {
                        if !self.exists_after(set, &parent) {
                            return Err(NamespaceError::Orphan { path: path.clone() });
                        }
                    }
                    for name in node.children() {
                        let child = path
                            .child(name)
                            .map_err(|_| NamespaceError::dangling_child(path, name))?;
                        if !self.exists_after(set, &child) {
                            return Err(NamespaceError::dangling_child(path, name));
                        }
                    }
                }
                None => {
                    if path.is_root() {
                        return Err(NamespaceError::RootImmutable);
                    }
                    if let Some(current) = self.get(path) {
                        for name in current.children() {
                            if let Ok(child) = path.child(name) {
                                if self.exists_after(set, &child) {
                                    return Err(NamespaceError::dangling_child(path, name));
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply a checked set. Infallible by construction.
    fn apply(&mut self, set: MutationSet) -> (Zxid, Vec<Mutation>) {
        let (zxid, mutations, images) = set.into_parts();
        for (path, image) in images {
            match image {
                Some(node) => {
                    self.nodes.insert(path, node);
                }
                None => {
                    self.nodes.remove(&path);
                }
            }
        }
        self.last_zxid = zxid;
        (zxid, mutations)
    }
}

/// The long-lived, process-wide namespace.
///
/// Readers take a [`Snapshot`] and run concurrently with each other and with
/// a batch that is still validating. Writers take the single [`WriteLock`];
/// holding it is what serializes batches.
#[derive(Debug, Default)]
pub struct Namespace {
    tree: RwLock<NamespaceTree>,
}

impl Namespace {
    /// Create a namespace holding only the root.
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(NamespaceTree::new()),
        }
    }

    /// Take a point-in-time read view.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            guard: self.tree.read(),
        }
    }

    /// Acquire the namespace-wide serialization point.
    ///
    /// Only one `WriteLock` exists at a time; snapshots remain available
    /// while it is held until `install` briefly takes exclusive access.
    pub fn begin_write(&self) -> WriteLock<'_> {
        WriteLock {
            guard: self.tree.upgradable_read(),
        }
    }

    // ==================== Convenience reads ====================

    /// Data and stat of `path`.
    pub fn get_data(&self, path: &ZPath) -> NamespaceResult<(Vec<u8>, Stat)> {
        let snapshot = self.snapshot();
        let node = snapshot.get(path).ok_or_else(|| NamespaceError::no_node(path))?;
        Ok((node.data().to_vec(), *node.stat()))
    }

    /// Stat of `path`, or `None` if it does not exist.
    pub fn exists(&self, path: &ZPath) -> Option<Stat> {
        self.snapshot().stat(path)
    }

    /// Sorted child names of `path`.
    pub fn get_children(&self, path: &ZPath) -> NamespaceResult<Vec<String>> {
        let snapshot = self.snapshot();
        let node = snapshot.get(path).ok_or_else(|| NamespaceError::no_node(path))?;
        Ok(node.children().map(str::to_string).collect())
    }

    pub fn last_zxid(&self) -> Zxid {
        self.snapshot().last_zxid()
    }
}

/// An immutable point-in-time view of the committed tree.
pub struct Snapshot<'a> {
    guard: RwLockReadGuard<'a, NamespaceTree>,
}

impl Snapshot<'_> {
    /// Copy the view out so it outlives the lock.
    pub fn detach(&self) -> NamespaceTree {
        self.guard.clone()
    }
}

impl Deref for Snapshot<'_> {
    type Target = NamespaceTree;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// The serialization point held for one batch's validate + install.
pub struct WriteLock<'a> {
    guard: RwLockUpgradableReadGuard<'a, NamespaceTree>,
}

impl<'a> WriteLock<'a> {
    /// Atomically apply `set`.
    ///
    /// The set is checked first; on error nothing is applied and the lock is
    /// released. On success the returned [`Installed`] still holds the
    /// serialization point, so the caller can publish notifications before
    /// the next batch can install.
    pub fn install(self, set: MutationSet) -> NamespaceResult<Installed<'a>> {
        self.guard.check(&set)?;

        let mut write = RwLockUpgradableReadGuard::upgrade(self.guard);
        let (zxid, mutations) = write.apply(set);
        let guard = RwLockWriteGuard::downgrade_to_upgradable(write);

        debug!(zxid, mutations = mutations.len(), "installed mutation set");

        Ok(Installed {
            guard,
            zxid,
            mutations,
        })
    }
}

impl Deref for WriteLock<'_> {
    type Target = NamespaceTree;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// A freshly installed batch, still holding the serialization point.
pub struct Installed<'a> {
    guard: RwLockUpgradableReadGuard<'a, NamespaceTree>,
    zxid: Zxid,
    mutations: Vec<Mutation>,
}

impl Installed<'_> {
    pub fn zxid(&self) -> Zxid {
        self.zxid
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }
}

impl Deref for Installed<'_> {
    type Target = NamespaceTree;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}
