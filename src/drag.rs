//! Drag lifecycle on top of the stateless snap resolver.
//!
//! A session remembers where the block started and the last preview. Every
//! pointer move re-runs [`find_snap_target`]; the drop runs it once more and
//! turns the result into either a [`BlockUpdate`] or a revert.

use serde::Serialize;

use crate::config::SnapConfig;
use crate::conflict::Conflict;
use crate::geometry::Point;
use crate::model::Block;
use crate::snap::{SnapResult, find_snap_target};
use crate::store::BlockUpdate;
use crate::timeline::TripTimeline;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DropOutcome {
    Accepted {
        update: BlockUpdate,
        /// Block the dropped block nested into, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },
    /// The block goes back to where the drag started.
    Rejected {
        revert_to: Point,
        conflicts: Vec<Conflict>,
    },
}

impl DropOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DropOutcome::Accepted { .. })
    }

    pub fn update(&self) -> Option<&BlockUpdate> {
        match self {
            DropOutcome::Accepted { update, .. } => Some(update),
            DropOutcome::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DragSession {
    original: Block,
    latest: Option<SnapResult>,
}

impl DragSession {
    pub fn start(block: &Block) -> Self {
        tracing::debug!(id = %block.id, x = block.x, y = block.y, "drag started");
        Self {
            original: block.clone(),
            latest: None,
        }
    }

    pub fn block_id(&self) -> &str {
        &self.original.id
    }

    pub fn origin(&self) -> Point {
        Point::new(self.original.x, self.original.y)
    }

    /// Result of the most recent [`Self::preview`].
    pub fn latest(&self) -> Option<&SnapResult> {
        self.latest.as_ref()
    }

    /// Resolve the pointer position for the live indicator. Only the latest
    /// result is kept.
    pub fn preview(
        &mut self,
        all_blocks: &[Block],
        pointer: Point,
        timeline: &TripTimeline,
        config: &SnapConfig,
    ) -> &SnapResult {
        let result = find_snap_target(&self.original, all_blocks, pointer, timeline, config);
        tracing::trace!(
            id = %self.original.id,
            x = pointer.x,
            y = pointer.y,
            snap = result.should_snap,
            valid = result.is_valid(),
            "drag preview"
        );
        self.latest.insert(result)
    }

    /// Resolve the drop. Nested drops take their time from the parent
    /// projection; free drops keep the block's time; grid drops only move.
    pub fn finish(
        self,
        all_blocks: &[Block],
        pointer: Point,
        timeline: &TripTimeline,
        config: &SnapConfig,
    ) -> DropOutcome {
        let result = find_snap_target(&self.original, all_blocks, pointer, timeline, config);
        let id = self.original.id.clone();

        if !result.is_valid() {
            tracing::debug!(
                id = %id,
                conflicts = result.validation.conflicts.len(),
                "drop rejected"
            );
            return DropOutcome::Rejected {
                revert_to: self.origin(),
                conflicts: result.validation.conflicts,
            };
        }

        let update = match (result.should_snap, result.validation.suggested_position) {
            (true, Some(pos)) => BlockUpdate {
                width: Some(pos.width),
                start_hour: Some(pos.start_hour),
                duration_hours: Some(pos.duration_hours),
                ..BlockUpdate::moved(id, result.snap_x, result.snap_y)
            },
            _ => BlockUpdate::moved(id, result.snap_x, result.snap_y),
        };
        tracing::debug!(
            id = %update.id,
            x = update.x,
            y = update.y,
            parent = ?result.parent_id,
            "drop accepted"
        );
        DropOutcome::Accepted {
            update,
            parent_id: result.parent_id,
        }
    }

    /// Abandon the drag; the block goes back to its starting point.
    pub fn cancel(self) -> Point {
        tracing::debug!(id = %self.original.id, "drag cancelled");
        self.origin()
    }
}
