use tracing::debug;

use crate::limits::MAX_BLOCKS;
use crate::model::*;

use super::EngineError;
use super::ids::IdSource;
use super::matching::validate_args;

// ── Add / drag finalize ───────────────────────────────────────────

/// Add a new block built from `args`.
///
/// The new block absorbs every same-day, same-type block it touches or
/// overlaps and is appended last. Opposite-type blocks are handled by
/// `policy`. Blocks on other days are never touched.
pub fn add(
    blocks: &[Block],
    args: &BlockArgs,
    policy: OverlapPolicy,
    ids: &mut impl IdSource,
) -> Result<Vec<Block>, EngineError> {
    validate_args(args)?;
    let candidate = Block::new(ids.next_id(), args.available, args.day_of_week, args.span());
    within_limit(absorb(blocks, candidate, policy, ids))
}

/// Finalize a drag: the last block is the provisional candidate and is merged
/// against everything before it, exactly as [`add`] would.
pub fn merge_drag(
    blocks: &[Block],
    policy: OverlapPolicy,
    ids: &mut impl IdSource,
) -> Result<Vec<Block>, EngineError> {
    let (candidate, rest) = blocks.split_last().ok_or(EngineError::NothingToMerge)?;
    within_limit(absorb(rest, *candidate, policy, ids))
}

/// Merges shrink the collection and trims can split blocks, so the bound is
/// checked on the result.
fn within_limit(blocks: Vec<Block>) -> Result<Vec<Block>, EngineError> {
    if blocks.len() > MAX_BLOCKS {
        return Err(EngineError::LimitExceeded("too many blocks"));
    }
    Ok(blocks)
}

fn absorb(
    existing: &[Block],
    mut candidate: Block,
    policy: OverlapPolicy,
    ids: &mut impl IdSource,
) -> Vec<Block> {
    let mut kept = existing.to_vec();

    // Repeat until a pass absorbs nothing: a block earlier in the list may only
    // touch the candidate after it has grown.
    let mut absorbed = 0usize;
    loop {
        let before = kept.len();
        kept.retain(|other| {
            if other.day != candidate.day
                || other.available != candidate.available
                || !other.span.touches(&candidate.span)
            {
                return true;
            }
            candidate.span = candidate.span.union(&other.span);
            false
        });
        if kept.len() == before {
            break;
        }
        absorbed += before - kept.len();
    }
    if absorbed > 0 {
        debug!(
            id = %candidate.id,
            day = candidate.day,
            start = candidate.span.start,
            end = candidate.span.end,
            absorbed,
            "merged same-type blocks"
        );
    }

    match policy {
        OverlapPolicy::KeepBoth => {
            kept.push(candidate);
            kept
        }
        OverlapPolicy::UnavailableWins if candidate.available => {
            let mut out = kept;
            let blockers = opposite_spans(&out, &candidate);
            let pieces = subtract_spans(&[candidate.span], &blockers);
            if pieces.len() != 1 || pieces[0] != candidate.span {
                debug!(id = %candidate.id, pieces = pieces.len(), "candidate trimmed by unavailable time");
            }
            push_pieces(&mut out, candidate, pieces, ids);
            out
        }
        OverlapPolicy::LastWriteWins | OverlapPolicy::UnavailableWins => {
            let mut out = carve(kept, &candidate, ids);
            out.push(candidate);
            out
        }
    }
}

/// Cut `cutter`'s span out of every same-day opposite-type block. A block
/// strictly containing the cutter splits in two; the right piece gets a new id.
fn carve(blocks: Vec<Block>, cutter: &Block, ids: &mut impl IdSource) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len() + 1);
    for block in blocks {
        if block.day != cutter.day
            || block.available == cutter.available
            || !block.span.overlaps(&cutter.span)
        {
            out.push(block);
            continue;
        }
        let pieces = subtract_spans(&[block.span], &[cutter.span]);
        debug!(id = %block.id, by = %cutter.id, pieces = pieces.len(), "trimmed opposite-type block");
        push_pieces(&mut out, block, pieces, ids);
    }
    out
}

/// Sorted, merged spans of the opposite-type blocks overlapping `candidate`.
fn opposite_spans(blocks: &[Block], candidate: &Block) -> Vec<Span> {
    let mut spans: Vec<Span> = blocks
        .iter()
        .filter(|b| {
            b.day == candidate.day
                && b.available != candidate.available
                && b.span.overlaps(&candidate.span)
        })
        .map(|b| b.span)
        .collect();
    spans.sort_by_key(|s| s.start);
    merge_overlapping(&spans)
}

fn push_pieces(out: &mut Vec<Block>, block: Block, pieces: Vec<Span>, ids: &mut impl IdSource) {
    for (i, span) in pieces.into_iter().enumerate() {
        let id = if i == 0 { block.id } else { ids.next_id() };
        out.push(Block { id, span, ..block });
    }
}

// ── Span helpers ──────────────────────────────────────────────────

/// Merge sorted overlapping/adjacent spans into disjoint spans.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.start <= last.end
        {
            last.end = last.end.max(span.end);
            continue;
        }
        merged.push(span);
    }
    merged
}

/// Remove `to_remove` from `base`. Both must be sorted by start.
pub fn subtract_spans(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut current_start = b.start;
        let current_end = b.end;

        while ri < to_remove.len() && to_remove[ri].end <= current_start {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < current_end {
            let r = &to_remove[j];
            if r.start > current_start {
                result.push(Span::new(current_start, r.start));
            }
            current_start = current_start.max(r.end);
            j += 1;
        }

        if current_start < current_end {
            result.push(Span::new(current_start, current_end));
        }
    }

    result
}
