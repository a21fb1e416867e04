//! SET DATA - stages a payload replacement.

use arbor_core::{version_matches, ErrorCode, Version};

use crate::buffer::TransactionBuffer;
use crate::executor::ExecutorLimits;
use crate::result::OpResult;

use super::{check_data_len, parse_path, OpOutcome};

/// Validate a set-data and stage the new payload with version + 1.
pub fn validate_set_data(
    buffer: &mut TransactionBuffer<'_>,
    path: &str,
    data: &[u8],
    version: Version,
    limits: &ExecutorLimits,
) -> OpOutcome {
    check_data_len(data, limits)?;
    let target = parse_path(path)?;

    let node = buffer.get(&target).ok_or(ErrorCode::NoNode)?;
    if !version_matches(version, node.version()) {
        return Err(ErrorCode::BadVersion);
    }

    let stat = buffer
        .stage_set_data(target, data.to_vec())
        .ok_or(ErrorCode::NoNode)?;
    Ok(OpResult::SetData { stat })
}
