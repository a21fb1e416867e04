//! Batch result types.

use arbor_core::{ErrorCode, Stat, Zxid};
use serde::{Deserialize, Serialize};

use crate::error::KeeperError;
use crate::executor::BatchState;

/// Result of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpResult {
    /// Created; `path` is the actual path (with any sequential suffix).
    Create { path: String },
    /// Deleted.
    Delete,
    /// Data replaced; `stat` carries the new version.
    SetData { stat: Stat },
    /// Version check passed.
    Check,
    /// The operation did not take effect.
    Error { code: ErrorCode },
}

impl OpResult {
    /// `Ok` for successes, the carried code otherwise.
    pub fn code(&self) -> ErrorCode {
        match self {
            OpResult::Error { code } => *code,
            _ => ErrorCode::Ok,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OpResult::Error { .. })
    }

    /// Created path if this is a Create result.
    pub fn created_path(&self) -> Option<&str> {
        match self {
            OpResult::Create { path } => Some(path),
            _ => None,
        }
    }

    /// New stat if this is a SetData result.
    pub fn stat(&self) -> Option<&Stat> {
        match self {
            OpResult::SetData { stat } => Some(stat),
            _ => None,
        }
    }
}

impl From<ErrorCode> for OpResult {
    fn from(code: ErrorCode) -> Self {
        OpResult::Error { code }
    }
}

/// Outcome of a whole batch: the overall code plus one result per operation.
///
/// `results.len()` always equals the number of submitted operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiResponse {
    outcome: ErrorCode,
    failed_index: Option<usize>,
    zxid: Option<Zxid>,
    results: Vec<OpResult>,
}

impl MultiResponse {
    /// A committed batch.
    pub fn committed(results: Vec<OpResult>, zxid: Option<Zxid>) -> Self {
        Self {
            outcome: ErrorCode::Ok,
            failed_index: None,
            zxid,
            results,
        }
    }

    /// A batch refused before any operation ran (`Unavailable`, limits).
    /// Every entry carries `code`.
    pub fn rejected(len: usize, code: ErrorCode) -> Self {
        Self {
            outcome: code,
            failed_index: None,
            zxid: None,
            results: vec![OpResult::Error { code }; len],
        }
    }

    /// The overall code: `Ok`, or the code that aborted the batch.
    pub fn outcome(&self) -> ErrorCode {
        self.outcome
    }

    pub fn is_committed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Terminal state of the batch.
    pub fn state(&self) -> BatchState {
        if self.is_committed() {
            BatchState::Committed
        } else {
            BatchState::Aborted
        }
    }

    /// Index of the operation whose own precondition failed.
    pub fn failed_index(&self) -> Option<usize> {
        self.failed_index
    }

    /// Zxid the batch committed under. `None` for aborted or empty batches.
    pub fn zxid(&self) -> Option<Zxid> {
        self.zxid
    }

    pub fn results(&self) -> &[OpResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Per-operation results on commit, a [`KeeperError`] otherwise.
    pub fn into_result(self) -> Result<Vec<OpResult>, KeeperError> {
        if self.is_committed() {
            Ok(self.results)
        } else {
            Err(KeeperError::Batch {
                code: self.outcome,
                index: self.failed_index,
                results: self.results,
            })
        }
    }
}

/// Collects provisional results while a batch validates and turns them into
/// the final response.
#[derive(Debug)]
pub struct ResultAggregator {
    len: usize,
    provisional: Vec<OpResult>,
}

impl ResultAggregator {
    /// Aggregator for a batch of `len` operations.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            provisional: Vec::with_capacity(len),
        }
    }

    /// Record the provisional success of the next operation.
    pub fn record(&mut self, result: OpResult) {
        self.provisional.push(result);
    }

    /// Every operation validated and the batch was installed.
    pub fn commit(self, zxid: Option<Zxid>) -> MultiResponse {
        debug_assert_eq!(self.provisional.len(), self.len);
        MultiResponse::committed(self.provisional, zxid)
    }

    /// Operation `index` failed with `code`.
    ///
    /// The failing entry carries `code`; every other entry, before or after
    /// it, carries `TransactionAborted` since nothing was applied.
    pub fn abort(self, index: usize, code: ErrorCode) -> MultiResponse {
        let results = (0..self.len)
            .map(|i| {
                if i == index {
                    OpResult::Error { code }
                } else {
                    OpResult::Error {
                        code: ErrorCode::TransactionAborted,
                    }
                }
            })
            .collect();
        MultiResponse {
            outcome: code,
            failed_index: Some(index),
            zxid: None,
            results,
        }
    }
}
