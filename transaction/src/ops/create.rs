//! CREATE - stages a new node.

use arbor_core::{CreateMode, ErrorCode, ZPath};

use crate::buffer::TransactionBuffer;
use crate::executor::ExecutorLimits;
use crate::result::OpResult;

use super::{check_data_len, parse_path, OpOutcome};

/// Validate a create.
///
/// Fails with `NoParent` if the parent is missing and with `NodeExists` if
/// the target is taken, both judged against tentative state. Sequential
/// creates take their suffix from the parent's child version.
pub fn validate_create(
    buffer: &mut TransactionBuffer<'_>,
    path: &str,
    data: &[u8],
    mode: CreateMode,
    limits: &ExecutorLimits,
) -> OpOutcome {
    check_data_len(data, limits)?;

    let requested = if mode.is_sequential() {
        ZPath::validate_sequential_prefix(path).map_err(|_| ErrorCode::BadArguments)?;
        // Stand-in for the final name, used only to locate the parent.
        parse_path(&format!("{path}0"))?
    } else {
        parse_path(path)?
    };

    let Some(parent) = requested.parent() else {
        return Err(ErrorCode::NodeExists);
    };
    let parent_node = buffer.get(&parent).ok_or(ErrorCode::NoParent)?;

    let target = if mode.is_sequential() {
        ZPath::with_sequence(path, parent_node.stat().cversion)
            .map_err(|_| ErrorCode::BadArguments)?
    } else {
        requested
    };

    if buffer.exists(&target) {
        return Err(ErrorCode::NodeExists);
    }

    let created = target.to_string();
    buffer
        .stage_create(target, data.to_vec())
        .ok_or(ErrorCode::NoParent)?;
    Ok(OpResult::Create { path: created })
}
