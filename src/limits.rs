use crate::model::{Day, Minute};

/// Exclusive upper bound of a block's end; `end == MINUTES_PER_DAY` is midnight.
pub const MINUTES_PER_DAY: Minute = 1440;

pub const DAYS_PER_WEEK: Day = 7;

/// Upper bound on stored blocks: a week of one-minute blocks.
pub const MAX_BLOCKS: usize = 10_080;

pub const DEFAULT_COMPACT_THRESHOLD: u64 = 1000;
