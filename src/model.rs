use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Minutes past midnight, the only time type.
pub type Minute = u16;

/// Day of week, `0..DAYS_PER_WEEK`.
pub type Day = u8;

/// Half-open interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Minute,
    pub end: Minute,
}

impl Span {
    pub fn new(start: Minute, end: Minute) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    /// Span between an anchor and a moving endpoint, in either order.
    pub fn between(a: Minute, b: Minute) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    /// Strict overlap; spans sharing only a boundary do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlap or a shared boundary. Same-type blocks that touch are merged.
    pub fn touches(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn union(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn has_endpoint(&self, t: Minute) -> bool {
        self.start == t || self.end == t
    }
}

/// A recurring weekly block of free or busy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Ulid,
    pub available: bool,
    pub day: Day,
    pub span: Span,
}

impl Block {
    pub fn new(id: Ulid, available: bool, day: Day, span: Span) -> Self {
        Self {
            id,
            available,
            day,
            span,
        }
    }

    /// Same block identity with new bounds.
    pub fn with_span(&self, span: Span) -> Self {
        Self { span, ..*self }
    }

    /// Field-tuple equality, ignoring the id.
    pub fn same_shape(&self, other: &Block) -> bool {
        self.available == other.available && self.day == other.day && self.span == other.span
    }
}

/// Field-tuple arguments the presentation layer sends with an action.
///
/// For adds and deletes `time1`/`time2` are the start and end. For anchor
/// updates `time1` is the fixed endpoint and `time2` the moving one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockArgs {
    pub available: bool,
    pub day_of_week: Day,
    pub time1: Minute,
    pub time2: Minute,
}

impl BlockArgs {
    pub fn new(available: bool, day_of_week: Day, time1: Minute, time2: Minute) -> Self {
        Self {
            available,
            day_of_week,
            time1,
            time2,
        }
    }

    /// Callers must validate first: `time1 == time2` has no span.
    pub fn span(&self) -> Span {
        Span::between(self.time1, self.time2)
    }
}

impl fmt::Display for BlockArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} day {} [{}, {}]",
            if self.available { "available" } else { "unavailable" },
            self.day_of_week,
            self.time1,
            self.time2
        )
    }
}

/// How a candidate block treats opposite-type blocks it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Both blocks are kept unchanged and overlap in the result.
    #[default]
    KeepBoth,
    /// The candidate cuts its span out of opposite-type blocks.
    LastWriteWins,
    /// Unavailable time always wins, whichever side is the candidate.
    UnavailableWins,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep-both" | "keep_both" => Ok(OverlapPolicy::KeepBoth),
            "last-write-wins" | "last_write_wins" => Ok(OverlapPolicy::LastWriteWins),
            "unavailable-wins" | "unavailable_wins" => Ok(OverlapPolicy::UnavailableWins),
            other => Err(format!("unknown overlap policy: {other}")),
        }
    }
}

/// One action record per call: the reducer input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Add(BlockArgs),
    /// Finalize a drag: merge the last block against the rest.
    MergeFinalize,
    UpdateByAnchor(BlockArgs),
    Delete(BlockArgs),
    Resize { id: Ulid, time1: Minute, time2: Minute },
    Remove { id: Ulid },
}

/// The log record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A committed action, with the policy it ran under and the ids it minted.
    Applied {
        action: Action,
        policy: OverlapPolicy,
        minted: Vec<Ulid>,
    },
    /// Full state, written by compaction.
    Snapshot { blocks: Vec<Block> },
}
