//! Mutation sets produced by committed batches.

use std::collections::BTreeMap;

use arbor_core::{Version, ZPath, Zxid};

use crate::node::Node;

/// One committed change, in batch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A node was created.
    Create { path: ZPath },
    /// A node was deleted.
    Delete { path: ZPath },
    /// A node's data was replaced; `version` is the new data version.
    SetData { path: ZPath, version: Version },
}

impl Mutation {
    pub fn path(&self) -> &ZPath {
        match self {
            Mutation::Create { path }
            | Mutation::Delete { path }
            | Mutation::SetData { path, .. } => path,
        }
    }
}

/// Everything one batch changes, ready to be installed.
///
/// `images` holds the final state of every touched path (`None` means the
/// path no longer exists); `mutations` is the ordered change log used for
/// notifications.
#[derive(Debug, Clone, Default)]
pub struct MutationSet {
    base_zxid: Zxid,
    zxid: Zxid,
    mutations: Vec<Mutation>,
    images: BTreeMap<ZPath, Option<Node>>,
}

impl MutationSet {
    /// Start a set on top of a store at `base_zxid`.
    pub fn new(base_zxid: Zxid) -> Self {
        Self {
            base_zxid,
            zxid: base_zxid + 1,
            mutations: Vec::new(),
            images: BTreeMap::new(),
        }
    }

    /// Zxid of the store state this set was computed against.
    pub fn base_zxid(&self) -> Zxid {
        self.base_zxid
    }

    /// Zxid the set commits under.
    pub fn zxid(&self) -> Zxid {
        self.zxid
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    /// Set the final image of `path`.
    pub fn set_image(&mut self, path: ZPath, image: Option<Node>) {
        self.images.insert(path, image);
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn images(&self) -> impl Iterator<Item = (&ZPath, Option<&Node>)> {
        self.images.iter().map(|(p, n)| (p, n.as_ref()))
    }

    /// Final image of `path`: `Some(None)` if deleted, `None` if untouched.
    pub fn image(&self, path: &ZPath) -> Option<Option<&Node>> {
        self.images.get(path).map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.images.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Zxid, Vec<Mutation>, BTreeMap<ZPath, Option<Node>>) {
        (self.zxid, self.mutations, self.images)
    }
}
