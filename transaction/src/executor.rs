//! Transaction executor for atomic multi-operation batches.

use std::sync::Arc;

use arbor_core::{ErrorCode, Zxid};
use arbor_namespace::{Mutation, Namespace};
use arbor_watch::{NotificationTrigger, WatchEvent};
use tracing::{debug, warn};

use crate::buffer::TransactionBuffer;
use crate::error::{TransactionError, TransactionResult};
use crate::op::Op;
use crate::ops::validate;
use crate::result::{MultiResponse, ResultAggregator};

/// Default payload bound, one byte under 1 MiB.
pub const DEFAULT_MAX_DATA_LEN: usize = 0xfffff;

/// Batch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Submitted, not yet holding the namespace.
    Pending,
    /// Holding the namespace and running validators.
    Validating,
    /// Installed and visible.
    Committed,
    /// Rolled back; nothing visible.
    Aborted,
}

impl BatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Committed | BatchState::Aborted)
    }

    /// Move to `next` if the state machine allows it.
    pub fn advance(self, next: BatchState) -> TransactionResult<BatchState> {
        match (self, next) {
            (BatchState::Pending, BatchState::Validating)
            | (BatchState::Validating, BatchState::Committed)
            | (BatchState::Validating, BatchState::Aborted) => Ok(next),
            (from, to) => Err(TransactionError::invalid_transition(from, to)),
        }
    }
}

/// Limits applied while validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    /// Largest accepted payload, in bytes.
    pub max_data_len: usize,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            max_data_len: DEFAULT_MAX_DATA_LEN,
        }
    }
}

/// Runs batches against the namespace.
///
/// Each batch holds the namespace write lock from the first validator until
/// its notifications are enqueued, so batches are linearized while plain
/// reads keep going against snapshots.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    namespace: Arc<Namespace>,
    trigger: Arc<NotificationTrigger>,
    limits: ExecutorLimits,
}

impl TransactionExecutor {
    /// Create a new executor.
    pub fn new(namespace: Arc<Namespace>, trigger: Arc<NotificationTrigger>) -> Self {
        Self {
            namespace,
            trigger,
            limits: ExecutorLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ExecutorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub fn trigger(&self) -> &Arc<NotificationTrigger> {
        &self.trigger
    }

    pub fn limits(&self) -> &ExecutorLimits {
        &self.limits
    }

    /// Run `batch` to a terminal state.
    ///
    /// Always returns one result per operation. Internal failures (the store
    /// refusing the install) surface as `Unavailable`, which guarantees
    /// nothing was applied.
    pub fn execute(&self, batch: &[Op]) -> MultiResponse {
        match self.try_execute(batch) {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, ops = batch.len(), "batch failed internally, nothing applied");
                MultiResponse::rejected(batch.len(), ErrorCode::Unavailable)
            }
        }
    }

    fn try_execute(&self, batch: &[Op]) -> TransactionResult<MultiResponse> {
        if batch.is_empty() {
            return Ok(MultiResponse::committed(Vec::new(), None));
        }

        let lock = self.namespace.begin_write();
        let state = BatchState::Pending.advance(BatchState::Validating)?;
        debug!(ops = batch.len(), base_zxid = lock.last_zxid(), "validating batch");

        let mut buffer = TransactionBuffer::new(&lock);
        let mut results = ResultAggregator::new(batch.len());

        for (index, op) in batch.iter().enumerate() {
            match validate(&mut buffer, op, &self.limits) {
                Ok(result) => results.record(result),
                Err(code) => {
                    let state = state.advance(BatchState::Aborted)?;
                    debug!(
                        index,
                        op = %op.kind(),
                        path = op.path(),
                        %code,
                        ?state,
                        "batch aborted"
                    );
                    return Ok(results.abort(index, code));
                }
            }
        }

        let set = buffer.into_mutation_set();
        let installed = lock.install(set)?;
        let state = state.advance(BatchState::Committed)?;

        let zxid = installed.zxid();
        let events: Vec<WatchEvent> = installed
            .mutations()
            .iter()
            .map(|m| event_for(m, zxid))
            .collect();
        self.trigger.fire(&events);
        drop(installed);

        debug!(zxid, ops = batch.len(), events = events.len(), ?state, "batch committed");
        Ok(results.commit(Some(zxid)))
    }
}

fn event_for(mutation: &Mutation, zxid: Zxid) -> WatchEvent {
    match mutation {
        Mutation::Create { path } => WatchEvent::created(path.clone(), zxid),
        Mutation::Delete { path } => WatchEvent::deleted(path.clone(), zxid),
        Mutation::SetData { path, .. } => WatchEvent::data_changed(path.clone(), zxid),
    }
}
