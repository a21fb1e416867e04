//! Per-operation status codes.
//!
//! The set is closed. Each code has a stable integer id that is used whenever
//! a code crosses a process boundary (serde encodes codes as that integer).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCode;

/// Status of one operation, or of a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    /// The operation (or batch) succeeded.
    Ok,
    /// The operation was valid or never evaluated, but a peer operation
    /// in the same batch failed and the whole batch rolled back.
    TransactionAborted,
    /// The namespace authority is unreachable or not authoritative.
    /// Nothing was applied; the only code eligible for retry.
    Unavailable,
    /// Malformed path, oversized payload or an operation on the root.
    BadArguments,
    /// The referenced path does not exist.
    NoNode,
    /// The expected version does not match the node's version.
    BadVersion,
    /// The create target already exists.
    NodeExists,
    /// The delete target still has children.
    NotEmpty,
    /// The create target's parent does not exist.
    NoParent,
}

impl ErrorCode {
    /// All codes, in id order.
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Ok,
        ErrorCode::TransactionAborted,
        ErrorCode::Unavailable,
        ErrorCode::BadArguments,
        ErrorCode::NoNode,
        ErrorCode::BadVersion,
        ErrorCode::NodeExists,
        ErrorCode::NotEmpty,
        ErrorCode::NoParent,
    ];

    /// The stable wire id.
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::Ok => 0,
            ErrorCode::TransactionAborted => -2,
            ErrorCode::Unavailable => -4,
            ErrorCode::BadArguments => -8,
            ErrorCode::NoNode => -101,
            ErrorCode::BadVersion => -103,
            ErrorCode::NodeExists => -110,
            ErrorCode::NotEmpty => -111,
            ErrorCode::NoParent => -120,
        }
    }

    /// Look up a code by its wire id.
    pub fn from_code(code: i32) -> Result<Self, UnknownCode> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or(UnknownCode(code))
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// Only `Unavailable` may be retried by the caller, because no
    /// mutation can have happened.
    pub fn is_retryable(self) -> bool {
        self == ErrorCode::Unavailable
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "Ok",
            ErrorCode::TransactionAborted => "TransactionAborted",
            ErrorCode::Unavailable => "Unavailable",
            ErrorCode::BadArguments => "BadArguments",
            ErrorCode::NoNode => "NoNode",
            ErrorCode::BadVersion => "BadVersion",
            ErrorCode::NodeExists => "NodeExists",
            ErrorCode::NotEmpty => "NotEmpty",
            ErrorCode::NoParent => "NoParent",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}
