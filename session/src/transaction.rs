//! Fluent batch builder.

use arbor_core::{CreateMode, Version};
use arbor_transaction::{MultiResponse, Op};

use crate::session::Session;

/// Collects operations and submits them as one batch.
///
/// ```ignore
/// let response = session
///     .transaction()
///     .create("/app", "", CreateMode::Persistent)
///     .create("/app/config", "v1", CreateMode::Persistent)
///     .commit();
/// ```
#[derive(Debug)]
#[must_use = "a transaction does nothing until committed"]
pub struct Transaction<'s> {
    session: &'s Session,
    ops: Vec<Op>,
}

impl<'s> Transaction<'s> {
    pub(crate) fn new(session: &'s Session) -> Self {
        Self {
            session,
            ops: Vec::new(),
        }
    }

    pub fn create(
        mut self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mode: CreateMode,
    ) -> Self {
        self.ops.push(Op::create_with_mode(path, data, mode));
        self
    }

    pub fn delete(mut self, path: impl Into<String>, version: Version) -> Self {
        self.ops.push(Op::delete(path, version));
        self
    }

    pub fn set_data(
        mut self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        version: Version,
    ) -> Self {
        self.ops.push(Op::set_data(path, data, version));
        self
    }

    pub fn check(mut self, path: impl Into<String>, version: Version) -> Self {
        self.ops.push(Op::check(path, version));
        self
    }

    /// Append an already-built operation.
    pub fn op(mut self, op: Op) -> Self {
        self.ops.push(op);
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Submit and wait.
    pub fn commit(self) -> MultiResponse {
        self.session.execute_sync(&self.ops)
    }

    /// Submit; `on_complete` runs once the batch is terminal.
    pub fn commit_async<F>(self, on_complete: F)
    where
        F: FnOnce(MultiResponse) + Send + 'static,
    {
        self.session.execute_async(self.ops, on_complete);
    }
}
