//! Common error types for Arbor.

use thiserror::Error;

/// Errors raised while validating a namespace path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is the empty string.
    #[error("path length must be > 0")]
    Empty,

    /// The path does not start with '/'.
    #[error("path must start with / character: {path}")]
    NotAbsolute { path: String },

    /// The path ends with '/' and is not the root.
    #[error("path must not end with / character: {path}")]
    TrailingSlash { path: String },

    /// Two consecutive separators.
    #[error("empty node name specified @{index} in {path}")]
    EmptySegment { path: String, index: usize },

    /// A "." or ".." segment.
    #[error("relative paths not allowed @{index} in {path}")]
    RelativeSegment { path: String, index: usize },

    /// A character outside the allowed set.
    #[error("invalid character {ch:?} @{index} in {path}")]
    InvalidChar { path: String, ch: char, index: usize },
}

impl PathError {
    pub fn not_absolute(path: impl Into<String>) -> Self {
        Self::NotAbsolute { path: path.into() }
    }

    pub fn trailing_slash(path: impl Into<String>) -> Self {
        Self::TrailingSlash { path: path.into() }
    }
}

/// Result type for path validation.
pub type PathResult<T> = Result<T, PathError>;

/// An integer that does not name any status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown status code: {0}")]
pub struct UnknownCode(pub i32);

/// A flag value that does not name any create mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown create mode flag: {0}")]
pub struct UnknownCreateMode(pub i32);
