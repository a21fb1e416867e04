//! Namespace error types.

use arbor_core::{ZPath, Zxid};
use thiserror::Error;

/// Errors raised by the namespace store.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// Node not found.
    #[error("no node at {path}")]
    NoNode { path: ZPath },

    /// The mutation set was built against an older view of the store.
    #[error("mutation set built on zxid {expected}, store is at zxid {actual}")]
    StaleMutationSet { expected: Zxid, actual: Zxid },

    /// Installing the set would leave a node without a parent.
    #[error("installing {path} would leave it without a parent")]
    Orphan { path: ZPath },

    /// Installing the set would leave a child entry pointing nowhere,
    /// or remove a node whose children survive.
    #[error("child {child} of {path} is inconsistent after install")]
    DanglingChild { path: ZPath, child: String },

    /// The root can not be removed.
    #[error("the root node can not be deleted")]
    RootImmutable,
}

impl NamespaceError {
    pub fn no_node(path: &ZPath) -> Self {
        Self::NoNode { path: path.clone() }
    }

    pub fn dangling_child(path: &ZPath, child: impl Into<String>) -> Self {
        Self::DanglingChild {
            path: path.clone(),
            child: child.into(),
        }
    }
}

/// Result type for namespace operations.
pub type NamespaceResult<T> = Result<T, NamespaceError>;
