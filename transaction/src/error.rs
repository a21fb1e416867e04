//! Transaction error types.

use arbor_core::ErrorCode;
use thiserror::Error;

use crate::executor::BatchState;
use crate::result::OpResult;

/// Internal executor errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The store refused the staged mutation set.
    #[error("install failed: {0}")]
    Install(#[from] arbor_namespace::NamespaceError),

    /// A batch state transition that the state machine does not allow.
    #[error("invalid batch transition {from:?} -> {to:?}")]
    InvalidTransition { from: BatchState, to: BatchState },
}

impl TransactionError {
    pub fn invalid_transition(from: BatchState, to: BatchState) -> Self {
        Self::InvalidTransition { from, to }
    }
}

/// Result type for transaction internals.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// A failed batch, for callers that prefer `?` over inspecting a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeeperError {
    /// The batch was aborted or rejected.
    #[error(
        "batch failed with {code}{}",
        .index.map(|i| format!(" at operation {i}")).unwrap_or_default()
    )]
    Batch {
        /// The batch outcome.
        code: ErrorCode,
        /// Index of the operation that caused the abort, if any one did.
        index: Option<usize>,
        /// The full per-operation results.
        results: Vec<OpResult>,
    },

    /// A single-node read failed.
    #[error("{code} for {path}")]
    Node { code: ErrorCode, path: String },
}

impl KeeperError {
    /// The batch outcome code.
    pub fn code(&self) -> ErrorCode {
        match self {
            KeeperError::Batch { code, .. } | KeeperError::Node { code, .. } => *code,
        }
    }

    /// Index of the failing operation.
    pub fn index(&self) -> Option<usize> {
        match self {
            KeeperError::Batch { index, .. } => *index,
            KeeperError::Node { .. } => None,
        }
    }

    pub fn results(&self) -> &[OpResult] {
        match self {
            KeeperError::Batch { results, .. } => results,
            KeeperError::Node { .. } => &[],
        }
    }

    pub fn node(code: ErrorCode, path: impl Into<String>) -> Self {
        Self::Node {
            code,
            path: path.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}
