//! Submission queue and the per-session worker loop.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use arbor_core::ErrorCode;
use arbor_transaction::{MultiResponse, Op, TransactionExecutor};
use crossbeam::channel::Receiver;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;

/// Completion callback for an asynchronous batch.
pub type CompletionFn = Box<dyn FnOnce(MultiResponse) + Send + 'static>;

/// A completion that fires exactly once.
///
/// If the handle is dropped without being completed (queue torn down, worker
/// gone) the callback still runs, with an `Unavailable` response.
pub(crate) struct Completion {
    callback: Option<CompletionFn>,
    len: usize,
}

impl Completion {
    pub(crate) fn new(len: usize, callback: CompletionFn) -> Self {
        Self {
            callback: Some(callback),
            len,
        }
    }

    pub(crate) fn complete(mut self, response: MultiResponse) {
        if let Some(callback) = self.callback.take() {
            invoke(callback, response);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            debug!(ops = self.len, "completion dropped, reporting unavailable");
            invoke(callback, MultiResponse::rejected(self.len, ErrorCode::Unavailable));
        }
    }
}

// A panicking callback must not take the worker down with it.
fn invoke(callback: CompletionFn, response: MultiResponse) {
    if panic::catch_unwind(AssertUnwindSafe(move || callback(response))).is_err() {
        warn!("completion callback panicked");
    }
}

/// A queued batch.
pub(crate) struct Submission {
    pub(crate) batch: Vec<Op>,
    pub(crate) completion: Completion,
}

/// State shared by a session handle and its worker.
pub(crate) struct Shared {
    pub(crate) executor: TransactionExecutor,
    pub(crate) authoritative: AtomicBool,
    pub(crate) config: ServerConfig,
}

impl Shared {
    pub(crate) fn is_authoritative(&self) -> bool {
        self.authoritative.load(Ordering::Acquire)
    }

    /// Run one batch to a response, honoring the authority gate.
    pub(crate) fn run(&self, batch: &[Op]) -> MultiResponse {
        if !self.is_authoritative() {
            debug!(ops = batch.len(), "not authoritative, rejecting batch");
            return MultiResponse::rejected(batch.len(), ErrorCode::Unavailable);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.executor.execute(batch))) {
            Ok(response) => response,
            Err(_) => {
                warn!(ops = batch.len(), "executor panicked, reporting unavailable");
                MultiResponse::rejected(batch.len(), ErrorCode::Unavailable)
            }
        }
    }
}

/// Run the worker loop.
///
/// Processes submissions in arrival order until every sender is gone; batches
/// already queued at that point still run.
pub(crate) fn run_worker(shared: &Shared, queue: Receiver<Submission>) {
    info!(worker = %shared.config.worker_name, "session worker started");
    let mut processed: u64 = 0;
    for Submission { batch, completion } in queue {
        let response = shared.run(&batch);
        completion.complete(response);
        processed += 1;
    }
    info!(worker = %shared.config.worker_name, processed, "session worker stopped");
}
