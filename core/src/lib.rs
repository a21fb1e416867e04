//! Arbor Core Types
//!
//! This crate provides the foundational types shared by every Arbor crate:
//! - Validated namespace paths (ZPath)
//! - Node metadata (Stat, Version, Zxid)
//! - The closed set of per-operation status codes (ErrorCode)
//! - Create modes (persistent, persistent-sequential)
//! - Common error types

mod code;
mod error;
mod mode;
mod path;
mod stat;

pub use code::*;
pub use error::*;
pub use mode::*;
pub use path::*;
pub use stat::*;
