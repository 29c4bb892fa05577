//! The snap resolver: where does a dragged block land?
//!
//! Resolution is layered, the first layer that applies wins:
//!
//! 1. **Containment snap.** Walk the block set in order and nest into the first
//!    parent that (a) may contain the dragged kind, (b) is within
//!    `snap_threshold` pixels of the dragged bounding box, (c) has room for the
//!    dragged block at the pointer's relative time, and (d) produces no
//!    error-level conflict there. The dragged block's start time is the
//!    pointer's fraction of the parent's width projected onto the parent's
//!    time range; its duration is kept, trimmed to the parent's end.
//! 2. **Time-locked free placement.** A timed block outside any parent can only
//!    sit at the x derived from its own time range. Drops further than
//!    `snap_threshold` from that x are rejected; closer drops are accepted,
//!    with existing conflicts reported at most as warnings.
//! 3. **Grid snap.** Blocks without time data round to the grid.
//!
//! Candidate parents are taken in block-set order, not by distance.
//!
//! The resolver is a pure function of its inputs. It is called on every
//! pointer move for the preview and once more on drop; no state carries over
//! between calls.

use serde::{Deserialize, Serialize};

use crate::config::SnapConfig;
use crate::conflict::{
    Conflict, ConflictType, PlacementValidation, Severity, detect_conflicts, has_errors,
    trip_bounds_conflict,
};
use crate::containment::{can_contain, vertical_offset};
use crate::geometry::{Point, snap_to_grid};
use crate::model::{Block, BlockKind};
use crate::timeline::{BlockPosition, TimeRange, TripTimeline, block_position_with_min};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapType {
    None,
    Flight,
    Hotel,
    Activity,
    Generic,
}

impl From<BlockKind> for SnapType {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Flight => SnapType::Flight,
            BlockKind::Hotel => SnapType::Hotel,
            BlockKind::Activity => SnapType::Activity,
            BlockKind::Generic => SnapType::Generic,
        }
    }
}

/// Outcome of one resolver call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    /// True only when the block nests into a parent.
    pub should_snap: bool,
    pub snap_x: f64,
    pub snap_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub snap_type: SnapType,
    pub validation: PlacementValidation,
}

impl SnapResult {
    pub fn position(&self) -> Point {
        Point::new(self.snap_x, self.snap_y)
    }

    /// Whether the drop may be committed.
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }
}

/// Resolve where `dragged` lands when its top-left corner is dropped at
/// `pointer`. `all_blocks` is the current block set; a stale copy of the
/// dragged block inside it is ignored.
pub fn find_snap_target(
    dragged: &Block,
    all_blocks: &[Block],
    pointer: Point,
    timeline: &TripTimeline,
    config: &SnapConfig,
) -> SnapResult {
    let Some(own_range) = dragged.time_range() else {
        return grid_snap(pointer, config.grid_size);
    };

    all_blocks
        .iter()
        .find_map(|parent| {
            try_nest(dragged, own_range, parent, all_blocks, pointer, timeline, config)
        })
        .unwrap_or_else(|| {
            free_placement(dragged, own_range, all_blocks, pointer, timeline, config)
        })
}

/// Time range the dragged block would occupy inside `parent_range` when its
/// left edge is at `pointer_x`. `None` when nothing of it fits.
pub fn project_into_parent(
    own: TimeRange,
    parent_x: f64,
    parent_width: f64,
    parent_range: TimeRange,
    pointer_x: f64,
) -> Option<TimeRange> {
    if parent_width.is_nan() || parent_width <= 0.0 {
        return None;
    }
    let relative = ((pointer_x - parent_x) / parent_width).clamp(0.0, 1.0);
    let start = parent_range.start_hour + relative * parent_range.duration_hours;
    let duration = own.duration_hours.min(parent_range.end_hour() - start);
    (duration > 0.0).then(|| TimeRange::new(start, duration))
}

fn try_nest(
    dragged: &Block,
    own_range: TimeRange,
    parent: &Block,
    all_blocks: &[Block],
    pointer: Point,
    timeline: &TripTimeline,
    config: &SnapConfig,
) -> Option<SnapResult> {
    if parent.id == dragged.id || !can_contain(parent.kind(), dragged.kind()) {
        return None;
    }
    let hit_box = parent.rect().expand(config.snap_threshold);
    if !dragged.rect_at(pointer.x, pointer.y).intersects(hit_box) {
        return None;
    }

    let parent_range = parent.time_range()?;
    let range = project_into_parent(own_range, parent.x, parent.width, parent_range, pointer.x)?;
    let position = block_position_with_min(
        range.start_hour,
        range.duration_hours,
        timeline.scale(),
        config.min_block_width,
    );

    let candidate = placed_at(dragged, &position, pointer.y);
    let conflicts = detect_conflicts(&candidate, all_blocks, Some(parent.id.as_str()));
    if has_errors(&conflicts) {
        return None;
    }

    Some(SnapResult {
        should_snap: true,
        snap_x: position.x,
        snap_y: parent.y + vertical_offset(dragged.kind(), parent, config.child_gap),
        parent_id: Some(parent.id.clone()),
        snap_type: dragged.kind().into(),
        validation: PlacementValidation::from_conflicts(conflicts, Some(position)),
    })
}

fn free_placement(
    dragged: &Block,
    own_range: TimeRange,
    all_blocks: &[Block],
    pointer: Point,
    timeline: &TripTimeline,
    config: &SnapConfig,
) -> SnapResult {
    let position = block_position_with_min(
        own_range.start_hour,
        own_range.duration_hours,
        timeline.scale(),
        config.min_block_width,
    );

    if (pointer.x - position.x).abs() > config.snap_threshold {
        return SnapResult {
            should_snap: false,
            snap_x: pointer.x,
            snap_y: pointer.y,
            parent_id: None,
            snap_type: SnapType::None,
            validation: PlacementValidation::rejected(Conflict::new(
                ConflictType::Logical,
                Severity::Error,
                &dragged.id,
                "Block must stay at its correct time position",
            )),
        };
    }

    // At its own time the block is always placeable; conflicts only decorate.
    let mut conflicts: Vec<Conflict> = detect_conflicts(dragged, all_blocks, None)
        .into_iter()
        .map(|c| Conflict {
            severity: c.severity.min(Severity::Warning),
            ..c
        })
        .collect();
    conflicts.extend(trip_bounds_conflict(dragged, timeline));
    SnapResult {
        should_snap: false,
        snap_x: position.x,
        snap_y: pointer.y,
        parent_id: None,
        snap_type: SnapType::None,
        validation: PlacementValidation::from_conflicts(conflicts, Some(position)),
    }
}

/// Grid fallback for blocks without temporal meaning. Never conflicts.
fn grid_snap(pointer: Point, grid_size: f64) -> SnapResult {
    let p = snap_to_grid(pointer, grid_size);
    SnapResult {
        should_snap: false,
        snap_x: p.x,
        snap_y: p.y,
        parent_id: None,
        snap_type: SnapType::None,
        validation: PlacementValidation::accepted(None),
    }
}

/// Copy of `block` moved to `position`, used for the putative conflict check.
fn placed_at(block: &Block, position: &BlockPosition, y: f64) -> Block {
    let mut candidate = block.clone();
    candidate.start_hour = Some(position.start_hour);
    candidate.duration_hours = Some(position.duration_hours);
    candidate.x = position.x;
    candidate.width = position.width;
    candidate.y = y;
    candidate
}
