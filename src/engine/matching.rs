use crate::limits::{DAYS_PER_WEEK, MINUTES_PER_DAY};
use crate::model::*;

use super::EngineError;

/// True unless `block` is exactly the block `args` describes: same type,
/// same day, `start == time1` and `end == time2`.
pub fn exact_mismatch(block: &Block, args: &BlockArgs) -> bool {
    block.available != args.available
        || block.day != args.day_of_week
        || block.span.start != args.time1
        || block.span.end != args.time2
}

/// True unless `block` has the same type and day as `args` and one of its
/// endpoints sits on the anchor `time1`. The other endpoint is ignored since
/// it is the one being dragged.
pub fn anchor_mismatch(block: &Block, args: &BlockArgs) -> bool {
    block.available != args.available
        || block.day != args.day_of_week
        || !block.span.has_endpoint(args.time1)
}

pub(crate) fn validate_bounds(time1: Minute, time2: Minute) -> Result<(), EngineError> {
    if time1 > MINUTES_PER_DAY || time2 > MINUTES_PER_DAY {
        return Err(EngineError::InvalidBlock("endpoint past midnight"));
    }
    if time1 == time2 {
        return Err(EngineError::InvalidBlock("empty span"));
    }
    Ok(())
}

pub(crate) fn validate_args(args: &BlockArgs) -> Result<(), EngineError> {
    if args.day_of_week >= DAYS_PER_WEEK {
        return Err(EngineError::InvalidBlock("day of week out of range"));
    }
    validate_bounds(args.time1, args.time2)
}
