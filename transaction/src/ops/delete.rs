//! DELETE - stages removal of a childless node.

use arbor_core::{version_matches, ErrorCode, Version};

use crate::buffer::TransactionBuffer;
use crate::result::OpResult;

use super::{parse_path, OpOutcome};

/// Validate a delete. Checks run in order: `NoNode`, `BadVersion`,
/// `NotEmpty`; children deleted earlier in the batch no longer count.
pub fn validate_delete(
    buffer: &mut TransactionBuffer<'_>,
    path: &str,
    version: Version,
) -> OpOutcome {
    let target = parse_path(path)?;
    if target.is_root() {
        return Err(ErrorCode::BadArguments);
    }

    let node = buffer.get(&target).ok_or(ErrorCode::NoNode)?;
    if !version_matches(version, node.version()) {
        return Err(ErrorCode::BadVersion);
    }
    if node.has_children() {
        return Err(ErrorCode::NotEmpty);
    }

    buffer.stage_delete(target).ok_or(ErrorCode::NoNode)?;
    Ok(OpResult::Delete)
}
