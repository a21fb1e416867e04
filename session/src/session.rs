//! The session handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use arbor_core::{CreateMode, ErrorCode, Stat, Version, ZPath};
use arbor_namespace::{Namespace, NamespaceError};
use arbor_transaction::{KeeperError, MultiResponse, Op, OpResult, TransactionExecutor};
use arbor_watch::{NotificationTrigger, WatchEvent};
use crossbeam::channel::{bounded, Receiver, SendError, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{SessionError, SessionResult};
use crate::transaction::Transaction;
use crate::worker::{run_worker, Completion, Shared, Submission};

/// A client session.
///
/// Batches submitted through one session run in submission order on the
/// session's worker thread. Sessions created over the same namespace are
/// linearized by the namespace itself.
pub struct Session {
    shared: Arc<Shared>,
    sender: Mutex<Option<Sender<Submission>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_thread: ThreadId,
}

impl Session {
    /// Open a session over a fresh namespace.
    pub fn new(config: ServerConfig) -> SessionResult<Self> {
        Self::with_namespace(
            config,
            Arc::new(Namespace::new()),
            Arc::new(NotificationTrigger::new()),
        )
    }

    /// Open a session over an existing namespace and trigger.
    pub fn with_namespace(
        config: ServerConfig,
        namespace: Arc<Namespace>,
        trigger: Arc<NotificationTrigger>,
    ) -> SessionResult<Self> {
        config.validate()?;
        let executor = TransactionExecutor::new(namespace, trigger).with_limits(config.limits());
        let (sender, queue) = bounded(config.queue_depth);
        let shared = Arc::new(Shared {
            executor,
            authoritative: AtomicBool::new(true),
            config,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(shared.config.worker_name.clone())
            .spawn(move || run_worker(&worker_shared, queue))
            .map_err(SessionError::Spawn)?;
        let worker_thread = worker.thread().id();

        Ok(Self {
            shared,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            worker_thread,
        })
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &ServerConfig {
        &self.shared.config
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        self.shared.executor.namespace()
    }

    pub fn trigger(&self) -> &Arc<NotificationTrigger> {
        self.shared.executor.trigger()
    }

    /// Subscribe to change events for every batch committed from now on.
    pub fn subscribe(&self) -> Receiver<WatchEvent> {
        self.trigger().subscribe()
    }

    // ==================== Authority ====================

    pub fn is_authoritative(&self) -> bool {
        self.shared.is_authoritative()
    }

    /// Mark whether this node may execute batches. While `false`, every
    /// batch (including ones already queued) completes with `Unavailable`.
    pub fn set_authoritative(&self, authoritative: bool) {
        self.shared
            .authoritative
            .store(authoritative, Ordering::Release);
        info!(authoritative, "session authority changed");
    }

    /// Stop accepting batches and wait for queued ones to finish.
    pub fn shutdown(&self) {
        let Some(sender) = self.sender.lock().take() else {
            return;
        };
        drop(sender);
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if self.on_worker() {
                debug!("shutdown requested from the worker, not joining");
                return;
            }
            if worker.join().is_err() {
                warn!("session worker panicked");
            }
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.lock().is_none()
    }

    // ==================== Batches ====================

    /// Start a fluent batch.
    pub fn transaction(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Run `batch` and wait for its response.
    pub fn execute_sync(&self, batch: &[Op]) -> MultiResponse {
        let len = batch.len();
        if self.on_worker() {
            // Called from a completion; queuing would wait on ourselves.
            if self.is_shut_down() {
                debug!(ops = len, "session shut down, rejecting batch");
                return MultiResponse::rejected(len, ErrorCode::Unavailable);
            }
            return self
                .precheck(len)
                .unwrap_or_else(|| self.shared.run(batch));
        }

        let (reply_tx, reply_rx) = bounded(1);
        let completion = Completion::new(
            len,
            Box::new(move |response| {
                let _ = reply_tx.send(response);
            }),
        );
        self.submit(batch.to_vec(), completion, Enqueue::Wait);
        reply_rx
            .recv()
            .unwrap_or_else(|_| MultiResponse::rejected(len, ErrorCode::Unavailable))
    }

    /// Queue `batch`; `on_complete` runs exactly once with its response.
    ///
    /// Never waits for queue space: if the queue is full the batch completes
    /// with `Unavailable` before this returns.
    pub fn execute_async<F>(&self, batch: Vec<Op>, on_complete: F)
    where
        F: FnOnce(MultiResponse) + Send + 'static,
    {
        let completion = Completion::new(batch.len(), Box::new(on_complete));
        self.submit(batch, completion, Enqueue::NoWait);
    }

    // ==================== Single operations ====================

    /// Create a node; returns the actual path.
    pub fn create(
        &self,
        path: &str,
        data: impl Into<Vec<u8>>,
        mode: CreateMode,
    ) -> Result<String, KeeperError> {
        match self.run_single(Op::create_with_mode(path, data, mode))? {
            OpResult::Create { path } => Ok(path),
            _ => Err(KeeperError::node(ErrorCode::Unavailable, path)),
        }
    }

    pub fn delete(&self, path: &str, version: Version) -> Result<(), KeeperError> {
        self.run_single(Op::delete(path, version)).map(drop)
    }

    /// Replace a node's data; returns the new stat.
    pub fn set_data(
        &self,
        path: &str,
        data: impl Into<Vec<u8>>,
        version: Version,
    ) -> Result<Stat, KeeperError> {
        match self.run_single(Op::set_data(path, data, version))? {
            OpResult::SetData { stat } => Ok(stat),
            _ => Err(KeeperError::node(ErrorCode::Unavailable, path)),
        }
    }

    pub fn check(&self, path: &str, version: Version) -> Result<(), KeeperError> {
        self.run_single(Op::check(path, version)).map(drop)
    }

    // ==================== Reads ====================

    /// Stat of `path`, or `None` if nothing lives there.
    pub fn exists(&self, path: &str) -> Result<Option<Stat>, KeeperError> {
        let path = parse(path)?;
        Ok(self.namespace().exists(&path))
    }

    pub fn get_data(&self, path: &str) -> Result<(Vec<u8>, Stat), KeeperError> {
        let path = parse(path)?;
        self.namespace().get_data(&path).map_err(read_error)
    }

    /// Sorted child names of `path`.
    pub fn get_children(&self, path: &str) -> Result<Vec<String>, KeeperError> {
        let path = parse(path)?;
        self.namespace().get_children(&path).map_err(read_error)
    }

    // ==================== Internals ====================

    fn on_worker(&self) -> bool {
        thread::current().id() == self.worker_thread
    }

    /// Rejections decided before a batch is queued.
    fn precheck(&self, len: usize) -> Option<MultiResponse> {
        if len > self.shared.config.max_batch_ops {
            debug!(ops = len, max = self.shared.config.max_batch_ops, "batch too large");
            return Some(MultiResponse::rejected(len, ErrorCode::BadArguments));
        }
        if !self.is_authoritative() {
            return Some(MultiResponse::rejected(len, ErrorCode::Unavailable));
        }
        None
    }

    fn submit(&self, batch: Vec<Op>, completion: Completion, enqueue: Enqueue) {
        if let Some(response) = self.precheck(batch.len()) {
            completion.complete(response);
            return;
        }
        let Some(sender) = self.sender.lock().clone() else {
            debug!(ops = batch.len(), "session shut down, rejecting batch");
            completion.complete(MultiResponse::rejected(batch.len(), ErrorCode::Unavailable));
            return;
        };

        // A dropped submission completes its batch with `Unavailable`.
        let submission = Submission { batch, completion };
        // The worker must never wait on the queue it drains.
        if enqueue == Enqueue::Wait && !self.on_worker() {
            if let Err(SendError(submission)) = sender.send(submission) {
                debug!(ops = submission.batch.len(), "worker gone, rejecting batch");
            }
            return;
        }
        match sender.try_send(submission) {
            Ok(()) => {}
            Err(TrySendError::Full(submission)) => {
                warn!(ops = submission.batch.len(), "submission queue full, rejecting batch");
            }
            Err(TrySendError::Disconnected(submission)) => {
                debug!(ops = submission.batch.len(), "worker gone, rejecting batch");
            }
        }
    }

    fn run_single(&self, op: Op) -> Result<OpResult, KeeperError> {
        let path = op.path().to_string();
        self.execute_sync(std::slice::from_ref(&op))
            .into_result()?
            .into_iter()
            .next()
            .ok_or_else(|| KeeperError::node(ErrorCode::Unavailable, path))
    }
}

/// Whether a submitter may wait for queue space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enqueue {
    Wait,
    NoWait,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.shared.config)
            .field("authoritative", &self.is_authoritative())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn parse(path: &str) -> Result<ZPath, KeeperError> {
    ZPath::parse(path).map_err(|_| KeeperError::node(ErrorCode::BadArguments, path))
}

fn read_error(err: NamespaceError) -> KeeperError {
    match err {
        NamespaceError::NoNode { path } => KeeperError::node(ErrorCode::NoNode, path.as_str()),
        other => {
            warn!(%other, "unexpected read failure");
            KeeperError::node(ErrorCode::Unavailable, "")
        }
    }
}
