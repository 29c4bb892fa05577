//! Scheduling conflict detection.
//!
//! Three checks run for a candidate placement, cheapest and most authoritative
//! first:
//! 1. logical order inside the block itself (check-out after check-in, return
//!    after outbound),
//! 2. temporal overlap with every other timed block,
//! 3. duplicated resources (same hotel, same flight number) at overlapping
//!    times.
//!
//! A placement is valid iff no reported [`Conflict`] has [`Severity::Error`].
//! Warnings and infos only decorate the canvas. Nothing here panics: blocks
//! with missing or broken time data simply take part in fewer checks.
//!
//! Overlap is not a conflict when it is containment: the candidate's intended
//! parent is skipped, and so is any pair whose kinds allow nesting and whose
//! ranges actually nest.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::containment::nests_within;
use crate::model::{Block, BlockDetails, HotelEventType, SegmentType};
use crate::timeline::{BlockPosition, TimeRange, TripTimeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Overlap,
    Logical,
    Resource,
}

/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub message: String,
    pub conflicting_block_id: String,
    pub severity: Severity,
}

impl Conflict {
    pub fn new(
        conflict_type: ConflictType,
        severity: Severity,
        conflicting_block_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            conflict_type,
            message: message.into(),
            conflicting_block_id: conflicting_block_id.into(),
            severity,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

pub fn has_errors(conflicts: &[Conflict]) -> bool {
    conflicts.iter().any(Conflict::is_error)
}

/// Verdict on one proposed placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementValidation {
    pub is_valid: bool,
    pub conflicts: Vec<Conflict>,
    pub can_snap: bool,
    /// Where the block will land if the placement is committed. Only present
    /// for valid placements of timed blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_position: Option<BlockPosition>,
}

impl PlacementValidation {
    /// Valid iff `conflicts` holds no errors; the suggestion is dropped
    /// otherwise.
    pub fn from_conflicts(conflicts: Vec<Conflict>, suggested_position: Option<BlockPosition>) -> Self {
        let ok = !has_errors(&conflicts);
        Self {
            is_valid: ok,
            conflicts,
            can_snap: ok,
            suggested_position: if ok { suggested_position } else { None },
        }
    }

    pub fn accepted(suggested_position: Option<BlockPosition>) -> Self {
        Self::from_conflicts(Vec::new(), suggested_position)
    }

    pub fn rejected(conflict: Conflict) -> Self {
        Self::from_conflicts(vec![conflict], None)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Individual checks
// ────────────────────────────────────────────────────────────────────────────

/// Ordering problems inside a single block. Independent of every other block.
pub fn detect_logical_conflicts(block: &Block) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    match &block.details {
        BlockDetails::Hotel(hotel) => {
            let checkin = hotel.event(HotelEventType::Checkin).and_then(|e| e.start_hour);
            let checkout = hotel.event(HotelEventType::Checkout).and_then(|e| e.start_hour);
            if let (Some(cin), Some(cout)) = (checkin, checkout) {
                if cin >= cout {
                    conflicts.push(Conflict::new(
                        ConflictType::Logical,
                        Severity::Error,
                        &block.id,
                        "Hotel check-out must be after check-in",
                    ));
                }
            }
        }
        BlockDetails::Flight(flight) => {
            let outbound = flight.segment(SegmentType::Outbound).and_then(|s| s.start_hour);
            let ret = flight.segment(SegmentType::Return).and_then(|s| s.start_hour);
            if let (Some(out), Some(ret)) = (outbound, ret) {
                if out >= ret {
                    conflicts.push(Conflict::new(
                        ConflictType::Logical,
                        Severity::Error,
                        &block.id,
                        "Return flight must be after outbound flight",
                    ));
                }
            }
        }
        BlockDetails::Activity(_) | BlockDetails::Generic => {}
    }
    conflicts
}

/// Overlap of `block` with `other`, reported against `other`. Nested pairs
/// (containment) and blocks without time data never conflict.
pub fn detect_overlap(block: &Block, other: &Block) -> Option<Conflict> {
    if block.id == other.id {
        return None;
    }
    let (a, b) = (block.time_range()?, other.time_range()?);
    if !a.overlaps(&b) || nests_within(block, other) || nests_within(other, block) {
        return None;
    }
    let hours = (a.overlap_hours(&b) * 10.0).round() / 10.0;
    Some(Conflict::new(
        ConflictType::Overlap,
        Severity::Error,
        &other.id,
        format!(
            "Time conflict: {} overlaps with {} by {}h",
            block.kind(),
            other.kind(),
            hours
        ),
    ))
}

/// Same hotel or same flight number booked twice at overlapping times.
/// Back-to-back stays at the same hotel are reported as [`Severity::Info`].
pub fn detect_resource_conflicts(candidate: &Block, others: &[Block]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for other in others.iter().filter(|o| o.id != candidate.id) {
        match (&candidate.details, &other.details) {
            (BlockDetails::Hotel(mine), BlockDetails::Hotel(theirs)) => {
                if !same_resource(&mine.hotel_name, &theirs.hotel_name) {
                    continue;
                }
                let (Some(a), Some(b)) = (candidate.time_range(), other.time_range()) else {
                    continue;
                };
                if a.overlaps(&b) {
                    conflicts.push(Conflict::new(
                        ConflictType::Resource,
                        Severity::Error,
                        &other.id,
                        format!(
                            "Same hotel ({}) already booked for overlapping dates",
                            mine.hotel_name.trim()
                        ),
                    ));
                } else if a.abuts(&b) {
                    conflicts.push(Conflict::new(
                        ConflictType::Resource,
                        Severity::Info,
                        &other.id,
                        format!(
                            "Back-to-back stays at {}; the bookings could be merged",
                            mine.hotel_name.trim()
                        ),
                    ));
                }
            }
            (BlockDetails::Flight(mine), BlockDetails::Flight(theirs)) => {
                let duplicate = mine.segments.iter().find_map(|ms| {
                    let mr = ms.time_range().or(candidate.time_range())?;
                    theirs
                        .segments
                        .iter()
                        .filter(|ts| same_resource(&ms.flight_number, &ts.flight_number))
                        .filter_map(|ts| ts.time_range().or(other.time_range()))
                        .any(|tr| mr.overlaps(&tr))
                        .then(|| ms.flight_number.trim().to_string())
                });
                if let Some(number) = duplicate {
                    conflicts.push(Conflict::new(
                        ConflictType::Resource,
                        Severity::Error,
                        &other.id,
                        format!("Same flight ({number}) already booked for overlapping time"),
                    ));
                }
            }
            _ => {}
        }
    }
    conflicts
}

/// Identifying names match case-insensitively; blank names never match.
fn same_resource(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

// ────────────────────────────────────────────────────────────────────────────
// Combined detection
// ────────────────────────────────────────────────────────────────────────────

/// All conflicts affecting `candidate` placed among `all_blocks`.
///
/// `intended_parent_id` names the block the candidate is about to nest into;
/// overlapping it is expected and not reported.
pub fn detect_conflicts(
    candidate: &Block,
    all_blocks: &[Block],
    intended_parent_id: Option<&str>,
) -> Vec<Conflict> {
    let mut conflicts = detect_logical_conflicts(candidate);
    for other in all_blocks {
        if Some(other.id.as_str()) == intended_parent_id {
            continue;
        }
        if let Some(c) = detect_overlap(candidate, other) {
            conflicts.push(c);
        }
    }
    conflicts.extend(detect_resource_conflicts(candidate, all_blocks));
    conflicts
}

/// Conflicts of an already placed block against the rest of the set.
pub fn all_conflicts(block: &Block, all_blocks: &[Block]) -> Vec<Conflict> {
    detect_conflicts(block, all_blocks, None)
}

/// Warning for a timed block that leaves the trip's date range.
pub fn trip_bounds_conflict(block: &Block, timeline: &TripTimeline) -> Option<Conflict> {
    let range: TimeRange = block.time_range()?;
    if timeline.contains_range(&range) {
        return None;
    }
    Some(Conflict::new(
        ConflictType::Logical,
        Severity::Warning,
        &block.id,
        format!("{} falls outside the trip dates", block.kind()),
    ))
}

/// Every block's conflicts keyed by id, in block-set order. Blocks without
/// conflicts are omitted.
pub fn conflict_report(blocks: &[Block], timeline: &TripTimeline) -> IndexMap<String, Vec<Conflict>> {
    let mut report = IndexMap::new();
    for block in blocks {
        let mut conflicts = all_conflicts(block, blocks);
        conflicts.extend(trip_bounds_conflict(block, timeline));
        if !conflicts.is_empty() {
            report.insert(block.id.clone(), conflicts);
        }
    }
    report
}
