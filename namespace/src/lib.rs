//! Arbor Namespace Store
//!
//! This crate provides the in-memory tree of versioned nodes:
//! - Node storage keyed by path, with per-node child sets and Stat
//! - Point-in-time read snapshots that run concurrently with each other
//! - A single write lock that serializes batches (validate, then install)
//! - Atomic install of a committed mutation set

mod error;
mod mutation;
mod node;
mod store;

pub use error::{NamespaceError, NamespaceResult};
pub use mutation::{Mutation, MutationSet};
pub use node::Node;
pub use store::{Installed, Namespace, NamespaceTree, Snapshot, WriteLock};
