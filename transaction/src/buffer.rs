//! Transaction buffer for tracking staged changes.
//!
//! The buffer is an overlay on top of the committed tree: reads consult the
//! staged images first and fall through to the tree. Nothing touches the
//! store until the executor installs the buffer's mutation set, so aborting
//! a batch is just dropping the buffer.

use std::collections::HashMap;

use arbor_core::{Stat, ZPath, Zxid};
use arbor_namespace::{Mutation, MutationSet, NamespaceTree, Node};

/// Tentative state of one batch.
#[derive(Debug)]
pub struct TransactionBuffer<'t> {
    /// The committed tree this batch runs against.
    base: &'t NamespaceTree,
    /// Staged images; `None` marks a path deleted by this batch.
    staged: HashMap<ZPath, Option<Node>>,
    /// Staged changes, in operation order.
    mutations: Vec<Mutation>,
}

impl<'t> TransactionBuffer<'t> {
    /// Create an empty buffer over `base`.
    pub fn new(base: &'t NamespaceTree) -> Self {
        Self {
            base,
            staged: HashMap::new(),
            mutations: Vec::new(),
        }
    }

    /// The zxid this batch will commit under.
    pub fn zxid(&self) -> Zxid {
        self.base.last_zxid() + 1
    }

    // ========== Reads ==========

    /// Get a node as this batch currently sees it.
    pub fn get(&self, path: &ZPath) -> Option<&Node> {
        match self.staged.get(path) {
            Some(image) => image.as_ref(),
            None => self.base.get(path),
        }
    }

    pub fn exists(&self, path: &ZPath) -> bool {
        self.get(path).is_some()
    }

    /// Check if this batch has touched `path`.
    pub fn is_staged(&self, path: &ZPath) -> bool {
        self.staged.contains_key(path)
    }

    /// Staged changes so far.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    // ========== Staging ==========

    /// Mutable access to a node, copying it out of the base on first write.
    fn node_mut(&mut self, path: &ZPath) -> Option<&mut Node> {
        if !self.staged.contains_key(path) {
            let node = self.base.get(path)?.clone();
            self.staged.insert(path.clone(), Some(node));
        }
        self.staged.get_mut(path).and_then(Option::as_mut)
    }

    /// Stage a node creation. Returns `None` (staging nothing) if the parent
    /// is missing or the path is already taken.
    pub fn stage_create(&mut self, path: ZPath, data: Vec<u8>) -> Option<()> {
        let parent = path.parent()?;
        if self.exists(&path) || !self.exists(&parent) {
            return None;
        }

        let zxid = self.zxid();
        self.node_mut(&parent)?.add_child(path.name(), zxid);
        self.staged.insert(path.clone(), Some(Node::new(data, zxid)));
        self.mutations.push(Mutation::Create { path });
        Some(())
    }

    /// Stage a node deletion. Returns `None` (staging nothing) if the node
    /// is missing, is the root, or still has children.
    pub fn stage_delete(&mut self, path: ZPath) -> Option<()> {
        let parent = path.parent()?;
        if self.get(&path)?.has_children() {
            return None;
        }

        let zxid = self.zxid();
        self.node_mut(&parent)?.remove_child(path.name(), zxid);
        self.staged.insert(path.clone(), None);
        self.mutations.push(Mutation::Delete { path });
        Some(())
    }

    /// Stage a data replacement and return the node's new stat.
    pub fn stage_set_data(&mut self, path: ZPath, data: Vec<u8>) -> Option<Stat> {
        let zxid = self.zxid();
        let node = self.node_mut(&path)?;
        node.set_data(data, zxid);
        let stat = *node.stat();
        self.mutations.push(Mutation::SetData {
            path,
            version: stat.version,
        });
        Some(stat)
    }

    /// Turn the staged changes into an installable set.
    pub fn into_mutation_set(self) -> MutationSet {
        let mut set = MutationSet::new(self.base.last_zxid());
        for (path, image) in self.staged {
            set.set_image(path, image);
        }
        for mutation in self.mutations {
            set.push(mutation);
        }
        set
    }
}
