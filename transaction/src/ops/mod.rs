//! Operation validators, one per operation kind.
//!
//! Each validator reads committed + tentative state through the buffer and
//! either stages its change and returns a provisional result, or returns the
//! code of the violated precondition without staging anything.

mod check;
mod create;
mod delete;
mod set_data;

use arbor_core::{ErrorCode, ZPath};

use crate::buffer::TransactionBuffer;
use crate::executor::ExecutorLimits;
use crate::op::Op;
use crate::result::OpResult;

pub use check::validate_check;
pub use create::validate_create;
pub use delete::validate_delete;
pub use set_data::validate_set_data;

/// Outcome of validating one operation.
pub type OpOutcome = Result<OpResult, ErrorCode>;

/// Validate `op` against the buffer, staging its change on success.
pub fn validate(buffer: &mut TransactionBuffer<'_>, op: &Op, limits: &ExecutorLimits) -> OpOutcome {
    match op {
        Op::Create { path, data, mode } => validate_create(buffer, path, data, *mode, limits),
        Op::Delete { path, version } => validate_delete(buffer, path, *version),
        Op::SetData {
            path,
            data,
            version,
        } => validate_set_data(buffer, path, data, *version, limits),
        Op::Check { path, version } => validate_check(buffer, path, *version),
    }
}

/// Parse a submitted path, mapping malformed input to `BadArguments`.
fn parse_path(path: &str) -> Result<ZPath, ErrorCode> {
    ZPath::parse(path).map_err(|_| ErrorCode::BadArguments)
}

/// Reject payloads above the configured bound.
fn check_data_len(data: &[u8], limits: &ExecutorLimits) -> Result<(), ErrorCode> {
    if data.len() > limits.max_data_len {
        return Err(ErrorCode::BadArguments);
    }
    Ok(())
}
