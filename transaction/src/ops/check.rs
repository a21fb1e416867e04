//! CHECK - conditions the batch on a node's version.

use arbor_core::{version_matches, ErrorCode, Version};

use crate::buffer::TransactionBuffer;
use crate::result::OpResult;

use super::{parse_path, OpOutcome};

/// Validate a version check. Stages nothing.
pub fn validate_check(buffer: &TransactionBuffer<'_>, path: &str, version: Version) -> OpOutcome {
    let target = parse_path(path)?;
    let node = buffer.get(&target).ok_or(ErrorCode::NoNode)?;
    if !version_matches(version, node.version()) {
        return Err(ErrorCode::BadVersion);
    }
    Ok(OpResult::Check)
}
