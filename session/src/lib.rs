//! Arbor Session
//!
//! Client-facing submission of batches and single operations.
//!
//! Responsibilities:
//! - Load server configuration
//! - Queue batches onto a per-session worker (FIFO per session)
//! - Synchronous and asynchronous submission with exactly-once completion
//! - Refuse work while the server is not authoritative
//! - Single-operation and read convenience calls
//!
//! # Module Structure
//!
//! - `config` - Server configuration (TOML)
//! - `worker` - Submission queue, completion handles, worker loop
//! - `session` - The session handle
//! - `transaction` - Fluent batch builder
//! - `error` - Error types

mod config;
mod error;
mod session;
mod transaction;
mod worker;

pub use config::{ServerConfig, DEFAULT_MAX_BATCH_OPS, DEFAULT_QUEUE_DEPTH};
pub use error::{SessionError, SessionResult};
pub use session::Session;
pub use transaction::Transaction;
pub use worker::CompletionFn;
