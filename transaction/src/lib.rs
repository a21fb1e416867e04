//! Arbor Transaction
//!
//! Atomic multi-operation batches over the namespace.
//!
//! Responsibilities:
//! - Describe operations (create / delete / set-data / check)
//! - Track tentative effects of earlier operations (transaction buffer)
//! - Validate each operation against committed + tentative state
//! - Commit all-or-nothing and attribute failures per operation
//! - Fire change notifications for committed batches
//!
//! # Module Structure
//!
//! - `op` - The closed operation enum
//! - `buffer` - Overlay of staged changes on top of the committed tree
//! - `ops/` - One validator per operation kind (create, delete, set_data, check)
//! - `result` - Per-operation results and the result aggregator
//! - `executor` - Batch orchestration and the batch state machine
//! - `error` - Error types

mod buffer;
mod error;
mod executor;
mod op;
mod ops;
mod result;

pub use buffer::TransactionBuffer;
pub use error::{KeeperError, TransactionError, TransactionResult};
pub use executor::{BatchState, ExecutorLimits, TransactionExecutor, DEFAULT_MAX_DATA_LEN};
pub use op::{Op, OpKind};
pub use ops::validate;
pub use result::{MultiResponse, OpResult, ResultAggregator};
