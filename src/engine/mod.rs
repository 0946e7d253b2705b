mod error;
mod ids;
mod matching;
mod merge;
mod mutations;
mod queries;

pub use error::EngineError;
pub use ids::{FreshIds, IdSource, RecordingIds, ReplayIds};
pub use matching::{anchor_mismatch, exact_mismatch};
pub use merge::{add, merge_drag, merge_overlapping, subtract_spans};
pub use mutations::{delete_exact, remove, resize, update_by_anchor};
pub use queries::{blocks_on_day, find_block, find_overlap, sorted_week, total_minutes};

use std::path::Path;

use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::model::*;
use crate::wal::Wal;

// ── Reducer ──────────────────────────────────────────────

/// Fold one action onto a collection, returning the new collection.
pub fn apply(
    blocks: &[Block],
    action: &Action,
    policy: OverlapPolicy,
    ids: &mut impl IdSource,
) -> Result<Vec<Block>, EngineError> {
    match action {
        Action::Add(args) => add(blocks, args, policy, ids),
        Action::MergeFinalize => merge_drag(blocks, policy, ids),
        Action::UpdateByAnchor(args) => update_by_anchor(blocks, args),
        Action::Delete(args) => Ok(delete_exact(blocks, args)),
        Action::Resize { id, time1, time2 } => resize(blocks, *id, *time1, *time2),
        Action::Remove { id } => Ok(remove(blocks, *id)),
    }
}

/// Rebuild a collection from log records. Each action replays under the
/// policy and with the ids it was committed with.
pub fn replay(events: &[Event]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for event in events {
        match event {
            Event::Snapshot { blocks: snapshot } => blocks = snapshot.clone(),
            Event::Applied {
                action,
                policy,
                minted,
            } => {
                let mut ids = ReplayIds::new(minted);
                match apply(&blocks, action, *policy, &mut ids) {
                    Ok(next) => blocks = next,
                    Err(e) => warn!("skipping unreplayable action {action:?}: {e}"),
                }
            }
        }
    }
    blocks
}

// ── Engine ───────────────────────────────────────────────

/// An open drag gesture: the provisional block and its fixed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub id: Ulid,
    pub anchor: Minute,
}

/// Owns the current collection, logs every committed action and tracks an
/// in-flight drag.
pub struct Engine {
    blocks: Vec<Block>,
    policy: OverlapPolicy,
    wal: Option<Wal>,
    compact_threshold: u64,
    drag: Option<DragSession>,
}

impl Engine {
    /// In-memory engine with no log.
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            blocks: Vec::new(),
            policy,
            wal: None,
            compact_threshold: 0,
            drag: None,
        }
    }

    /// Replay the log at `path`, then keep appending to it. A torn tail left by
    /// a crash is cut off first. A `compact_threshold` of 0 disables automatic
    /// compaction; appends replayed from an uncompacted log count towards it.
    pub fn open(
        path: &Path,
        policy: OverlapPolicy,
        compact_threshold: u64,
    ) -> Result<Self, EngineError> {
        let (wal, events) = Wal::open(path).map_err(|e| EngineError::WalError(e.to_string()))?;
        let blocks = replay(&events);
        info!(
            path = %path.display(),
            events = events.len(),
            blocks = blocks.len(),
            ?policy,
            "availability log replayed"
        );
        Ok(Self {
            blocks,
            policy,
            wal: Some(wal),
            compact_threshold,
            drag: None,
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    /// Apply `action` and commit it. On error nothing changes.
    pub fn dispatch(&mut self, action: Action) -> Result<&[Block], EngineError> {
        self.commit(action)?;
        Ok(&self.blocks)
    }

    /// Returns the ids the action minted.
    fn commit(&mut self, action: Action) -> Result<Vec<Ulid>, EngineError> {
        let mut ids = RecordingIds::default();
        let next = apply(&self.blocks, &action, self.policy, &mut ids)?;
        let minted = ids.into_minted();
        if let Some(wal) = self.wal.as_mut() {
            let event = Event::Applied {
                action,
                policy: self.policy,
                minted: minted.clone(),
            };
            wal.append(&event)
                .map_err(|e| EngineError::WalError(e.to_string()))?;
        }
        self.blocks = next;

        if self.compact_threshold > 0
            && self
                .wal
                .as_ref()
                .is_some_and(|w| w.appends_since_compact() >= self.compact_threshold)
            && let Err(e) = self.compact()
        {
            // The action is already durable; compaction retries on the next commit.
            warn!("compaction failed: {e}");
        }
        Ok(minted)
    }

    /// Rewrite the log as a single snapshot of the current state.
    pub fn compact(&mut self) -> Result<(), EngineError> {
        let Some(wal) = self.wal.as_mut() else {
            return Ok(());
        };
        let snapshot = Event::Snapshot {
            blocks: self.blocks.clone(),
        };
        wal.compact(std::slice::from_ref(&snapshot))
            .map_err(|e| EngineError::WalError(e.to_string()))?;
        info!(blocks = self.blocks.len(), "availability log compacted");
        Ok(())
    }

    // ── Drag session ─────────────────────────────────────

    /// Add the provisional block for a drag starting at `args.time1`.
    ///
    /// The provisional block merges like any add, so the anchor becomes the
    /// merged block's endpoint on the side opposite the drag direction.
    pub fn begin_drag(&mut self, args: BlockArgs) -> Result<Ulid, EngineError> {
        if self.drag.is_some() {
            return Err(EngineError::DragInProgress);
        }
        let minted = self.commit(Action::Add(args))?;
        let id = minted
            .first()
            .copied()
            .ok_or(EngineError::NoMatchingBlock(args))?;
        // Under UnavailableWins an available block can be cut away entirely.
        let block = *find_block(&self.blocks, id).ok_or(EngineError::UnknownBlock(id))?;
        let anchor = if args.time2 >= args.time1 {
            block.span.start
        } else {
            block.span.end
        };
        debug!(%id, anchor, "drag started");
        self.drag = Some(DragSession { id, anchor });
        Ok(id)
    }

    /// Move the free endpoint of the dragged block to `to`.
    pub fn drag_to(&mut self, to: Minute) -> Result<&[Block], EngineError> {
        let session = self.drag.ok_or(EngineError::NoDragInProgress)?;
        self.dispatch(Action::Resize {
            id: session.id,
            time1: session.anchor,
            time2: to,
        })
    }

    /// Finalize the drag, merging the dragged block with its neighbours.
    pub fn end_drag(&mut self) -> Result<&[Block], EngineError> {
        let session = self.drag.take().ok_or(EngineError::NoDragInProgress)?;
        let block = *find_block(&self.blocks, session.id)
            .ok_or(EngineError::UnknownBlock(session.id))?;
        if self.blocks.last().map(|b| b.id) != Some(session.id) {
            // The finalize merges the last block; put the dragged one there.
            self.commit(Action::Resize {
                id: block.id,
                time1: block.span.start,
                time2: block.span.end,
            })?;
        }
        self.dispatch(Action::MergeFinalize)
    }
}
