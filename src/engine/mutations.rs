use tracing::{debug, warn};
use ulid::Ulid;

use crate::model::*;

use super::EngineError;
use super::matching::{anchor_mismatch, exact_mismatch, validate_args, validate_bounds};

/// Resize the block anchored at `args.time1` so it spans to `args.time2`.
///
/// The matched block keeps its id, type and day and moves to the end of the
/// collection. Neighbours are not re-merged: a drag in progress may overlap
/// them until the drag is finalized.
pub fn update_by_anchor(blocks: &[Block], args: &BlockArgs) -> Result<Vec<Block>, EngineError> {
    validate_args(args)?;
    let mut matches = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| !anchor_mismatch(b, args));
    let (index, target) = matches
        .next()
        .ok_or(EngineError::NoMatchingBlock(*args))?;
    let others = matches.count();
    if others > 0 {
        warn!(%args, count = others + 1, "anchor update matched several blocks");
        return Err(EngineError::AmbiguousMatch {
            args: *args,
            count: others + 1,
        });
    }
    Ok(move_to_end(blocks, index, target.with_span(args.span())))
}

/// Remove every block exactly matching `args`. No match leaves the
/// collection unchanged.
pub fn delete_exact(blocks: &[Block], args: &BlockArgs) -> Vec<Block> {
    let out: Vec<Block> = blocks
        .iter()
        .filter(|b| exact_mismatch(b, args))
        .copied()
        .collect();
    match blocks.len() - out.len() {
        0 => debug!(%args, "delete matched nothing"),
        1 => {}
        n => warn!(%args, removed = n, "delete matched several blocks"),
    }
    out
}

/// Resize a block by id to `[min(time1, time2), max(time1, time2))`.
pub fn resize(
    blocks: &[Block],
    id: Ulid,
    time1: Minute,
    time2: Minute,
) -> Result<Vec<Block>, EngineError> {
    validate_bounds(time1, time2)?;
    let index = blocks
        .iter()
        .position(|b| b.id == id)
        .ok_or(EngineError::UnknownBlock(id))?;
    let resized = blocks[index].with_span(Span::between(time1, time2));
    Ok(move_to_end(blocks, index, resized))
}

/// Remove a block by id. Unknown ids are a no-op.
pub fn remove(blocks: &[Block], id: Ulid) -> Vec<Block> {
    let out: Vec<Block> = blocks.iter().filter(|b| b.id != id).copied().collect();
    if out.len() == blocks.len() {
        debug!(%id, "remove matched nothing");
    }
    out
}

fn move_to_end(blocks: &[Block], index: usize, replacement: Block) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    out.extend_from_slice(&blocks[..index]);
    out.extend_from_slice(&blocks[index + 1..]);
    out.push(replacement);
    out
}
