use ulid::Ulid;

use crate::model::*;

/// Blocks on `day`, sorted by start.
pub fn blocks_on_day(blocks: &[Block], day: Day) -> Vec<Block> {
    let mut out: Vec<Block> = blocks.iter().filter(|b| b.day == day).copied().collect();
    out.sort_by_key(|b| (b.span.start, b.span.end));
    out
}

/// Every block, sorted by day then start.
pub fn sorted_week(blocks: &[Block]) -> Vec<Block> {
    let mut out = blocks.to_vec();
    out.sort_by_key(|b| (b.day, b.span.start, b.span.end, b.available));
    out
}

pub fn find_block(blocks: &[Block], id: Ulid) -> Option<&Block> {
    blocks.iter().find(|b| b.id == id)
}

/// First pair of same-day blocks that overlap where `policy` forbids it.
///
/// Same-type blocks may never overlap. Opposite-type blocks may overlap only
/// under [`OverlapPolicy::KeepBoth`].
pub fn find_overlap(blocks: &[Block], policy: OverlapPolicy) -> Option<(Block, Block)> {
    let sorted = sorted_week(blocks);
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if b.day != a.day || b.span.start >= a.span.end {
                break;
            }
            if a.available == b.available || policy != OverlapPolicy::KeepBoth {
                return Some((*a, *b));
            }
        }
    }
    None
}

/// Summed minutes across the week of blocks of one type.
pub fn total_minutes(blocks: &[Block], available: bool) -> u32 {
    blocks
        .iter()
        .filter(|b| b.available == available)
        .map(|b| u32::from(b.span.duration()))
        .sum()
}
