//! Parent/child groupings used by the label layer.
//!
//! A block `c` is a child of `p` when `p` may contain `c`'s kind, `c`'s time
//! range lies inside `p`'s, and neither block carries an error-level conflict
//! that involves the pair. Each block has at most one parent: among all
//! qualifying parents the one with the shortest time range wins (ties go to
//! the earlier block in the set). Nesting stays pairwise, so
//! flight ⊇ hotel ⊇ activity yields `flight → {hotel}` and
//! `hotel → {activity}`, never a flattened three-way group.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conflict::{detect_logical_conflicts, detect_resource_conflicts, has_errors};
use crate::containment::nests_within;
use crate::model::{Block, BlockKind};

/// Ordered pair of kinds, displayed as e.g. `flight-hotel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipType {
    pub parent: BlockKind,
    pub child: BlockKind,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parent, self.child)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRelationship {
    pub parent: Block,
    /// In block-set order.
    pub children: Vec<Block>,
    /// Parent kind paired with the most significant child kind (hotel before
    /// activity before generic).
    pub relationship_type: RelationshipType,
}

impl BlockRelationship {
    pub fn contains_child(&self, id: &str) -> bool {
        self.children.iter().any(|c| c.id == id)
    }
}

/// True when `parent`/`child` may be grouped: containment holds and no
/// error-level conflict involves either of them as a pair.
fn groupable(parent: &Block, child: &Block) -> bool {
    nests_within(parent, child)
        && !has_errors(&detect_logical_conflicts(parent))
        && !has_errors(&detect_logical_conflicts(child))
        && !has_errors(&detect_resource_conflicts(child, std::slice::from_ref(parent)))
}

/// Index of the tightest valid parent of `blocks[child_idx]`.
fn tightest_parent(blocks: &[Block], child_idx: usize) -> Option<usize> {
    let child = &blocks[child_idx];
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in blocks.iter().enumerate() {
        if idx == child_idx || !groupable(candidate, child) {
            continue;
        }
        let Some(range) = candidate.time_range() else {
            continue;
        };
        // Equal ranges nest both ways; only the earlier block may be the parent.
        if idx > child_idx && child.time_range() == Some(range) {
            continue;
        }
        if best.is_none_or(|(_, d)| range.duration_hours < d) {
            best = Some((idx, range.duration_hours));
        }
    }
    best.map(|(idx, _)| idx)
}

/// One relationship per block that ends up with children, in block-set order
/// of the parents. Roots without children are omitted.
pub fn group_relationships(blocks: &[Block]) -> Vec<BlockRelationship> {
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); blocks.len()];
    for child_idx in 0..blocks.len() {
        if let Some(parent_idx) = tightest_parent(blocks, child_idx) {
            children_of[parent_idx].push(child_idx);
        }
    }

    children_of
        .into_iter()
        .enumerate()
        .filter(|(_, children)| !children.is_empty())
        .map(|(parent_idx, children)| {
            let parent = blocks[parent_idx].clone();
            let children: Vec<Block> = children.into_iter().map(|i| blocks[i].clone()).collect();
            let child_kind = children
                .iter()
                .map(Block::kind)
                .min_by_key(|k| kind_rank(*k))
                .unwrap_or(BlockKind::Generic);
            BlockRelationship {
                relationship_type: RelationshipType {
                    parent: parent.kind(),
                    child: child_kind,
                },
                parent,
                children,
            }
        })
        .collect()
}

fn kind_rank(kind: BlockKind) -> u8 {
    match kind {
        BlockKind::Flight => 0,
        BlockKind::Hotel => 1,
        BlockKind::Activity => 2,
        BlockKind::Generic => 3,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Label ownership
// ────────────────────────────────────────────────────────────────────────────

/// How a block takes part in labeling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelRole<'a> {
    /// Draws its own, ungrouped label.
    Individual,
    /// Draws the combined label for its group.
    GroupParent(&'a BlockRelationship),
    /// Covered by the parent's combined label; draws nothing.
    GroupedChild { parent_id: &'a str },
}

/// A block that is both a child and a parent (hotel inside a flight holding
/// activities) is folded into its own parent's label.
pub fn label_role<'a>(block_id: &str, relationships: &'a [BlockRelationship]) -> LabelRole<'a> {
    if let Some(rel) = relationships.iter().find(|r| r.contains_child(block_id)) {
        return LabelRole::GroupedChild {
            parent_id: rel.parent.id.as_str(),
        };
    }
    match relationships.iter().find(|r| r.parent.id == block_id) {
        Some(rel) => LabelRole::GroupParent(rel),
        None => LabelRole::Individual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityDetails, BlockDetails, FlightDetails, HotelDetails};

    fn timed(id: &str, details: BlockDetails, start: f64, dur: f64) -> Block {
        Block {
            id: id.to_string(),
            title: id.to_string(),
            x: start * 20.0,
            y: 0.0,
            width: dur * 20.0,
            height: 60.0,
            start_hour: Some(start),
            duration_hours: Some(dur),
            color: None,
            details,
        }
    }

    fn activity(id: &str, start: f64, dur: f64) -> Block {
        timed(
            id,
            BlockDetails::Activity(ActivityDetails {
                activity_type: "tour".into(),
                location: String::new(),
            }),
            start,
            dur,
        )
    }

    #[test]
    fn test_relationship_type_display() {
        let t = RelationshipType {
            parent: BlockKind::Flight,
            child: BlockKind::Hotel,
        };
        assert_eq!(t.to_string(), "flight-hotel");
    }

    #[test]
    fn test_mixed_children_prefer_hotel_kind() {
        let blocks = vec![
            timed("f", BlockDetails::Flight(FlightDetails::new("A", "B")), 0.0, 48.0),
            activity("a", 1.0, 2.0),
            timed("h", BlockDetails::Hotel(HotelDetails::new("H", "L")), 20.0, 10.0),
        ];
        let rels = group_relationships(&blocks);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].relationship_type.to_string(), "flight-hotel");
        let ids: Vec<&str> = rels[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "h"]);
    }

    #[test]
    fn test_tie_goes_to_first_parent() {
        let blocks = vec![
            timed("h1", BlockDetails::Hotel(HotelDetails::new("Grand", "SF")), 0.0, 10.0),
            timed("h2", BlockDetails::Hotel(HotelDetails::new("Plaza", "SF")), 0.0, 10.0),
            activity("a", 2.0, 1.0),
        ];
        let rels = group_relationships(&blocks);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].parent.id, "h1");
    }

    #[test]
    fn test_equal_ranges_never_parent_each_other() {
        let blocks = vec![
            timed("g1", BlockDetails::Generic, 0.0, 10.0),
            timed("g2", BlockDetails::Generic, 0.0, 10.0),
            timed("g3", BlockDetails::Generic, 0.0, 10.0),
        ];
        assert_eq!(tightest_parent(&blocks, 0), None);
        assert_eq!(tightest_parent(&blocks, 1), Some(0));
        assert_eq!(tightest_parent(&blocks, 2), Some(0));
    }

    #[test]
    fn test_label_roles() {
        let blocks = vec![
            timed("f", BlockDetails::Flight(FlightDetails::new("A", "B")), 0.0, 24.0),
            timed("h", BlockDetails::Hotel(HotelDetails::new("H", "L")), 5.0, 10.0),
            activity("a", 7.0, 2.0),
            activity("lone", 30.0, 2.0),
        ];
        let rels = group_relationships(&blocks);
        assert!(matches!(label_role("f", &rels), LabelRole::GroupParent(r) if r.parent.id == "f"));
        assert_eq!(label_role("h", &rels), LabelRole::GroupedChild { parent_id: "f" });
        assert_eq!(label_role("a", &rels), LabelRole::GroupedChild { parent_id: "h" });
        assert_eq!(label_role("lone", &rels), LabelRole::Individual);
    }
}
