//! Watch error types.

use thiserror::Error;

/// The consumer behind a sink is gone; the sink will be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("watch sink closed")]
pub struct SinkClosed;

/// Result type for sink delivery.
pub type WatchResult<T> = Result<T, SinkClosed>;
